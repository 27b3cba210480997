//! Helper macro for declaring driven-port error enums.
//!
//! Each variant carries named fields and a display template. The macro
//! derives `thiserror::Error` and emits a snake_case constructor per variant
//! whose parameters accept anything convertible into the field types.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),* $(,)? } => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field : $ty),* },
            )*
        }

        impl $name {
            $(
                ::paste::paste! {
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                        Self::$variant { $($field: $field.into()),* }
                    }
                }
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum LedgerProbeError {
            Connection { message: String } => "ledger unreachable: {message}",
            Capacity { room: i64, limit: u32 } => "room {room} capped at {limit}",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = LedgerProbeError::connection("pool timed out");
        assert_eq!(err.to_string(), "ledger unreachable: pool timed out");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = LedgerProbeError::capacity(7_i64, 3_u32);
        assert_eq!(err, LedgerProbeError::Capacity { room: 7, limit: 3 });
        assert_eq!(err.to_string(), "room 7 capped at 3");
    }
}
