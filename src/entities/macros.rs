//! Macros for reducing boilerplate when defining entities

/// Implement [`Entity`](crate::core::Entity) for a struct with an `id: String` field
///
/// # Example
/// ```rust,ignore
/// impl_entity!(Vehicle, "vehicle", "vehicles");
///
/// // Entity scoped to a user through its `user_id` field
/// impl_entity!(Expense, "expense", "expenses", owner: user_id);
/// ```
#[macro_export]
macro_rules! impl_entity {
    ($type:ident, $singular:expr, $plural:expr) => {
        impl $crate::core::Entity for $type {
            fn resource_name() -> &'static str {
                $plural
            }

            fn resource_name_singular() -> &'static str {
                $singular
            }

            fn id(&self) -> &str {
                &self.id
            }
        }
    };

    ($type:ident, $singular:expr, $plural:expr, owner: $owner:ident) => {
        impl $crate::core::Entity for $type {
            fn resource_name() -> &'static str {
                $plural
            }

            fn resource_name_singular() -> &'static str {
                $singular
            }

            fn id(&self) -> &str {
                &self.id
            }

            fn owner_id(&self) -> Option<&str> {
                Some(&self.$owner)
            }
        }
    };
}

/// Build [`DraftRules`](crate::core::validation::DraftRules) declaratively
///
/// Field names are string literals (JSON names, so `"type"` works). Filters
/// run before validators; validators run in the order fields are listed.
///
/// # Example
/// ```
/// use shelf::draft_rules;
///
/// let rules = draft_rules!("expense",
///     validate: {
///         "amount": [required, numeric, positive],
///         "category": [required, in_list("Food", "Bills")],
///     },
///     filters: {
///         "amount": [to_number],
///     }
/// );
///
/// let err = rules
///     .check(serde_json::json!({"amount": "-5", "category": "Food"}))
///     .unwrap_err();
/// assert_eq!(err.to_string(), "amount must be positive");
/// ```
#[macro_export]
macro_rules! draft_rules {
    (
        $entity_type:expr,
        validate: {
            $( $val_field:literal : [ $( $validator:tt )* ] ),* $(,)?
        }
        $(,
        filters: {
            $( $fil_field:literal : [ $( $filter:tt )* ] ),* $(,)?
        }
        )?
        $(,)?
    ) => {{
        let mut rules = $crate::core::validation::DraftRules::new($entity_type);
        $($(
            $crate::add_filters_for_field!(rules, $fil_field, $( $filter )*);
        )*)?
        $(
            $crate::add_validators_for_field!(rules, $val_field, $( $validator )*);
        )*
        rules
    }};
}

/// Helper macro to add validators to a field
#[macro_export]
macro_rules! add_validators_for_field {
    // Base case: empty
    ($config:expr, $field:expr,) => {};

    // separator
    ($config:expr, $field:expr, , $( $rest:tt )*) => {
        $crate::add_validators_for_field!($config, $field, $( $rest )*);
    };

    // required
    ($config:expr, $field:expr, required $( $rest:tt )*) => {
        $config.add_validator($field, $crate::core::validation::validators::required());
        $crate::add_validators_for_field!($config, $field, $( $rest )*);
    };

    // optional
    ($config:expr, $field:expr, optional $( $rest:tt )*) => {
        $config.add_validator($field, $crate::core::validation::validators::optional());
        $crate::add_validators_for_field!($config, $field, $( $rest )*);
    };

    // numeric
    ($config:expr, $field:expr, numeric $( $rest:tt )*) => {
        $config.add_validator($field, $crate::core::validation::validators::numeric());
        $crate::add_validators_for_field!($config, $field, $( $rest )*);
    };

    // positive
    ($config:expr, $field:expr, positive $( $rest:tt )*) => {
        $config.add_validator($field, $crate::core::validation::validators::positive());
        $crate::add_validators_for_field!($config, $field, $( $rest )*);
    };

    // string_length with parameters
    ($config:expr, $field:expr, string_length($min:expr, $max:expr) $( $rest:tt )*) => {
        $config.add_validator($field, $crate::core::validation::validators::string_length($min, $max));
        $crate::add_validators_for_field!($config, $field, $( $rest )*);
    };

    // in_list with values
    ($config:expr, $field:expr, in_list($( $value:expr ),* $(,)?) $( $rest:tt )*) => {
        $config.add_validator($field, $crate::core::validation::validators::in_list(vec![$( $value.to_string() ),*]));
        $crate::add_validators_for_field!($config, $field, $( $rest )*);
    };

    // one_of with a slice of allowed values
    ($config:expr, $field:expr, one_of($values:expr) $( $rest:tt )*) => {
        $config.add_validator(
            $field,
            $crate::core::validation::validators::in_list($values.iter().map(|v| v.to_string()).collect()),
        );
        $crate::add_validators_for_field!($config, $field, $( $rest )*);
    };

    // date_format with format string
    ($config:expr, $field:expr, date_format($format:expr) $( $rest:tt )*) => {
        $config.add_validator($field, $crate::core::validation::validators::date_format($format));
        $crate::add_validators_for_field!($config, $field, $( $rest )*);
    };

    // email
    ($config:expr, $field:expr, email $( $rest:tt )*) => {
        $config.add_validator(
            $field,
            $crate::core::validation::validators::format($crate::core::field::FieldFormat::Email),
        );
        $crate::add_validators_for_field!($config, $field, $( $rest )*);
    };
}

/// Helper macro to add filters to a field
#[macro_export]
macro_rules! add_filters_for_field {
    // Base case: empty
    ($config:expr, $field:expr,) => {};

    // separator
    ($config:expr, $field:expr, , $( $rest:tt )*) => {
        $crate::add_filters_for_field!($config, $field, $( $rest )*);
    };

    // trim
    ($config:expr, $field:expr, trim $( $rest:tt )*) => {
        $config.add_filter($field, $crate::core::validation::filters::trim());
        $crate::add_filters_for_field!($config, $field, $( $rest )*);
    };

    // to_number
    ($config:expr, $field:expr, to_number $( $rest:tt )*) => {
        $config.add_filter($field, $crate::core::validation::filters::to_number());
        $crate::add_filters_for_field!($config, $field, $( $rest )*);
    };

    // round_decimals with parameter
    ($config:expr, $field:expr, round_decimals($decimals:expr) $( $rest:tt )*) => {
        $config.add_filter($field, $crate::core::validation::filters::round_decimals($decimals));
        $crate::add_filters_for_field!($config, $field, $( $rest )*);
    };
}
