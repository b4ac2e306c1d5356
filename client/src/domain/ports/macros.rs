//! Helper macro for declaring port error enums.
//!
//! Each variant gets a `thiserror` message and a snake_case constructor whose
//! parameters accept `impl Into<T>`, so adapters can write
//! `UserDirectoryError::transport("refused")` instead of spelling out the
//! struct literal.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum UplinkError {
            Offline => "uplink offline",
            Refused { message: String } => "uplink refused: {message}",
            Status { status: u16, message: String } => "uplink status {status}: {message}",
        }
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(UplinkError::offline().to_string(), "uplink offline");
    }

    #[test]
    fn string_fields_accept_borrowed_input() {
        let err = UplinkError::refused("connection reset");
        assert_eq!(err, UplinkError::Refused { message: "connection reset".to_owned() });
        assert_eq!(err.to_string(), "uplink refused: connection reset");
    }

    #[test]
    fn mixed_fields_keep_their_types() {
        let err = UplinkError::status(503_u16, "maintenance");
        assert_eq!(err.to_string(), "uplink status 503: maintenance");
    }
}
