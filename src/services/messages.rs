use std::fmt;

use crate::{
    core::{
        choice::choice_enum,
        credentials::Credentials,
        error::{Error, Result},
        xml::{XmlMap, XmlValue},
    },
    services::query::document,
};

choice_enum! {
    MessageAction("action") {
        MarkAsRead => "mark_as_read",
        MarkAsUnread => "mark_as_unread",
        Archive => "archive",
        MarkAsReadAndArchive => "mark_as_read_and_archive",
        Unarchive => "unarchive",
        Reply => "reply",
        Create => "create",
    }
}

choice_enum! {
    /// Recipient of a message.
    MessageTo("recipient") {
        CallCenter => "CALLCENTER",
        Client => "CLIENT",
        All => "ALL",
    }
}

choice_enum! {
    MessageSubject("subject") {
        ProductInformation => "product_information",
        ShippingInformation => "shipping_information",
        OrderInformation => "order_information",
        OfferProblem => "offer_problem",
        OfferNotReceived => "offer_not_received",
        OtherQuestion => "other_question",
    }
}

choice_enum! {
    MessageType("type") {
        Order => "ORDER",
        Offer => "OFFER",
    }
}

/// An action on a buyer/seller conversation, as sent to `messages_update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    action: MessageAction,
    id: String,
    to: MessageTo,
    description: String,
    subject: Option<MessageSubject>,
    kind: MessageType,
}

impl Message {
    pub fn new(action: MessageAction, id: impl Into<String>) -> Self {
        Self {
            action,
            id: id.into(),
            to: MessageTo::All,
            description: String::new(),
            subject: None,
            kind: MessageType::Order,
        }
    }

    /// Like [`Message::new`], with the action given by its wire value.
    pub fn parse(action: &str, id: impl Into<String>) -> Result<Self> {
        Ok(Self::new(action.parse()?, id))
    }

    pub fn with_to(mut self, to: MessageTo) -> Self {
        self.to = to;
        self
    }

    pub fn with_subject(mut self, subject: MessageSubject) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn with_type(mut self, kind: MessageType) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn action(&self) -> MessageAction {
        self.action
    }

    pub fn set_action(&mut self, value: &str) -> Result<()> {
        self.action = value.parse()?;
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, value: impl Into<String>) {
        self.id = value.into();
    }

    pub fn to(&self) -> MessageTo {
        self.to
    }

    pub fn set_to(&mut self, value: &str) -> Result<()> {
        self.to = value.parse()?;
        Ok(())
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.description = value.into();
    }

    pub fn subject(&self) -> Option<MessageSubject> {
        self.subject
    }

    pub fn set_subject(&mut self, value: &str) -> Result<()> {
        self.subject = Some(value.parse()?);
        Ok(())
    }

    pub fn kind(&self) -> MessageType {
        self.kind
    }

    pub fn set_type(&mut self, value: &str) -> Result<()> {
        self.kind = value.parse()?;
        Ok(())
    }

    /// The `message` element of a `messages_update` request.
    pub fn to_element(&self) -> XmlMap {
        let subject = self.subject.map(|subject| subject.as_str()).unwrap_or_default();

        let mut message = XmlMap::new();
        message.insert("@action".to_string(), XmlValue::text(self.action.as_str()));
        message.insert("@id".to_string(), XmlValue::text(self.id.as_str()));
        message.insert("message_to".to_string(), text_node(self.to.as_str()));
        message.insert("message_subject".to_string(), text_node(subject));
        message.insert("message_description".to_string(), text_node(&self.description));
        message.insert("message_type".to_string(), text_node(self.kind.as_str()));
        message
    }

    pub fn to_dict(&self) -> XmlMap {
        let mut dict = XmlMap::new();
        dict.insert("message".to_string(), XmlValue::Map(self.to_element()));
        dict
    }
}

fn text_node(text: &str) -> XmlValue {
    let mut node = XmlMap::new();
    node.insert("#text".to_string(), XmlValue::text(text));
    XmlValue::Map(node)
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Message")?;
        writeln!(f, "action     : {}", self.action)?;
        writeln!(f, "id         : {}", self.id)?;
        writeln!(f, "to         : {}", self.to)?;
        writeln!(f, "description: {}", self.description)?;
        writeln!(f, "subject    : {}", self.subject.map(|s| s.as_str()).unwrap_or_default())?;
        write!(f, "type       : {}", self.kind)
    }
}

/// Filters of a `messages_query` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessagesQuery {
    pub paging: u32,
    pub results_count: u32,
}

impl Default for MessagesQuery {
    fn default() -> Self {
        Self { paging: 1, results_count: 100 }
    }
}

pub fn messages_query_request(credentials: &Credentials, query: &MessagesQuery) -> XmlMap {
    let mut root = credentials.request_root();
    root.insert("@results_count".to_string(), XmlValue::text(query.results_count.to_string()));
    root.insert("paging".to_string(), XmlValue::text(query.paging.to_string()));
    document("messages_query", root)
}

/// Fails with [`Error::EmptyRequest`] when `messages` is empty.
pub fn messages_update_request(credentials: &Credentials, messages: &[Message]) -> Result<XmlMap> {
    if messages.is_empty() {
        return Err(Error::EmptyRequest { request: "messages_update", element: "message" });
    }
    let mut root = credentials.request_root();
    let items = messages.iter().map(|message| XmlValue::Map(message.to_element())).collect();
    root.insert("message".to_string(), XmlValue::from_items(items));
    Ok(document("messages_update", root))
}
