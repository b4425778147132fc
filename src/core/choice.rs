/// Declares a closed set of string values accepted by an API field.
///
/// The generated enum parses from its wire value and rejects anything else
/// with a [`ValidationError`](crate::core::error::ValidationError) listing the
/// accepted values.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($field:literal) {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const VALUES: &'static [&'static str] = &[$($value),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::core::error::ValidationError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err($crate::core::error::ValidationError {
                        field: $field,
                        value: s.to_string(),
                        allowed: Self::VALUES,
                    }),
                }
            }
        }
    };
}

pub(crate) use choice_enum;
