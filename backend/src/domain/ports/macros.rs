//! `define_port_error!` builds port error enums with snake_case constructors.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            /// Construct this variant.
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
            /// Construct this variant.
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
                $variant $( { $(
                    /// Detail reported by the adapter.
                    $field : $ty
                ),* } )?,
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
    use rstest::rstest;

    define_port_error! {
        pub enum SheetPortError {
            Locked => "sheet is locked",
            Missing { message: String } => "missing: {message}",
            Overflow { limit: u32 } => "over limit {limit}",
            Rejected { message: String, index: u32 } => "rejected {message} at {index}",
        }
    }

    #[rstest]
    fn unit_variant_gets_a_constructor() {
        assert_eq!(SheetPortError::locked(), SheetPortError::Locked);
        assert_eq!(SheetPortError::locked().to_string(), "sheet is locked");
    }

    #[rstest]
    fn string_fields_accept_str() {
        assert_eq!(SheetPortError::missing("roster").to_string(), "missing: roster");
    }

    #[rstest]
    fn non_string_fields_keep_their_type() {
        assert_eq!(SheetPortError::overflow(3_u32).to_string(), "over limit 3");
    }

    #[rstest]
    fn mixed_fields_are_passed_in_order() {
        let err = SheetPortError::rejected("Tarde", 2_u32);
        assert_eq!(err.to_string(), "rejected Tarde at 2");
    }
}
