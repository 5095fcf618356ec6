//! Newtypes over PostgreSQL `SERIAL` identifiers.

/// A raw identifier that is zero or negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{entity} id must be a positive integer, got {value}")]
pub struct InvalidSerialId {
    /// Entity the identifier belongs to.
    pub entity: &'static str,
    /// Rejected value.
    pub value: i64,
}

macro_rules! define_serial_id {
    ($(#[$meta:meta])* $name:ident => $entity:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(i32);

        impl $name {
            /// Validate and wrap a raw identifier.
            pub fn new(raw: i32) -> Result<Self, $crate::domain::InvalidSerialId> {
                if raw <= 0 {
                    return Err($crate::domain::InvalidSerialId {
                        entity: $entity,
                        value: i64::from(raw),
                    });
                }
                Ok(Self(raw))
            }

            /// Raw integer value.
            #[must_use]
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl TryFrom<i64> for $name {
            type Error = $crate::domain::InvalidSerialId;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                let raw = i32::try_from(value).map_err(|_| $crate::domain::InvalidSerialId {
                    entity: $entity,
                    value,
                })?;
                Self::new(raw)
            }
        }
    };
}

pub(crate) use define_serial_id;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    define_serial_id! {
        /// Identifier used only by these tests.
        WidgetId => "widget"
    }

    #[rstest]
    #[case(0)]
    #[case(-4)]
    fn non_positive_values_are_rejected(#[case] raw: i32) {
        let err = WidgetId::new(raw).expect_err("must reject");
        assert_eq!(err.entity, "widget");
        assert_eq!(err.to_string(), format!("widget id must be a positive integer, got {raw}"));
    }

    #[rstest]
    fn wide_values_outside_i32_are_rejected() {
        let err = WidgetId::try_from(i64::from(i32::MAX) + 1).expect_err("overflow");
        assert_eq!(err.value, i64::from(i32::MAX) + 1);
    }

    #[rstest]
    fn positive_values_round_trip() {
        let id = WidgetId::try_from(42_i64).expect("valid");
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");
    }
}
