//! Defines the helper macro for generating domain port error enums.
//!
//! Every port error variant carries one `message` with the transport detail;
//! the macro derives `thiserror::Error`, a snake-case constructor per variant,
//! and a `detail()` accessor.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $display:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($display)]
                $variant {
                    /// Transport or server detail for logs.
                    message: String,
                },
            )*
        }

        impl $name {
            $(
                ::paste::paste! {
                    #[doc = concat!("Build a `", stringify!($variant), "` error.")]
                    pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                        Self::$variant {
                            message: message.into(),
                        }
                    }
                }
            )*

            /// Detail recorded when the error was raised.
            pub fn detail(&self) -> &str {
                match self {
                    $( Self::$variant { message } => message.as_str(), )*
                }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        pub enum ExamplePortError {
            Offline => "offline: {message}",
            RateLimited => "slow down: {message}",
        }
    }

    #[test]
    fn constructors_accept_str() {
        let err = ExamplePortError::offline("no route");
        assert_eq!(err.to_string(), "offline: no route");
    }

    #[test]
    fn multi_word_variants_get_snake_case_constructors() {
        let err = ExamplePortError::rate_limited("429");
        assert_eq!(err, ExamplePortError::RateLimited { message: "429".to_owned() });
    }

    #[test]
    fn detail_returns_the_raw_message() {
        let err = ExamplePortError::rate_limited("retry later");
        assert_eq!(err.detail(), "retry later");
    }
}
