#[cfg(test)]
mod tests {
    use std::any::Any;
    use tabula_core::{Fault, Value, identity_hash};

    #[test]
    fn test_coerce_integers() {
        let prototype = Value::Int32(None);
        assert_eq!(
            Value::Int64(Some(412)).coerce(&prototype).unwrap(),
            Value::Int32(Some(412))
        );
        assert_eq!(
            Value::Int8(Some(-3)).coerce(&Value::Int64(None)).unwrap(),
            Value::Int64(Some(-3))
        );
        assert_eq!(
            Value::Varchar(Some(" 17 ".into())).coerce(&prototype).unwrap(),
            Value::Int32(Some(17))
        );
        assert_eq!(
            Value::Float64(Some(2.0)).coerce(&prototype).unwrap(),
            Value::Int32(Some(2))
        );
        assert!(Value::Float64(Some(2.5)).coerce(&prototype).is_err());
        assert!(Value::Varchar(Some("many".into())).coerce(&prototype).is_err());
    }

    #[test]
    fn test_coerce_out_of_range() {
        let error = Value::Int64(Some(300))
            .coerce(&Value::Int8(None))
            .unwrap_err();
        assert!(matches!(
            error.downcast_ref::<Fault>(),
            Some(Fault::ValueConversion { to: "TINYINT", .. })
        ));
        assert!(Value::Int64(Some(i64::MAX)).coerce(&Value::Int32(None)).is_err());
        assert_eq!(
            Value::Int64(Some(127)).coerce(&Value::Int8(None)).unwrap(),
            Value::Int8(Some(127))
        );
    }

    #[test]
    fn test_coerce_other_types() {
        assert_eq!(
            Value::Int64(Some(1)).coerce(&Value::Boolean(None)).unwrap(),
            Value::Boolean(Some(true))
        );
        assert_eq!(
            Value::Varchar(Some("false".into()))
                .coerce(&Value::Boolean(None))
                .unwrap(),
            Value::Boolean(Some(false))
        );
        assert_eq!(
            Value::Int32(Some(3)).coerce(&Value::Float32(None)).unwrap(),
            Value::Float32(Some(3.0))
        );
        assert_eq!(
            Value::Float64(Some(0.5)).coerce(&Value::Varchar(None)).unwrap(),
            Value::Varchar(Some("0.5".into()))
        );
        assert_eq!(
            Value::Null.coerce(&Value::Float64(None)).unwrap(),
            Value::Float64(None)
        );
        assert!(Value::Int32(Some(1)).coerce(&Value::Null).is_err());
    }

    #[test]
    fn test_zero_and_null() {
        assert_eq!(Value::Int16(Some(9)).zero(), Value::Int16(Some(0)));
        assert_eq!(Value::Boolean(None).zero(), Value::Boolean(Some(false)));
        assert_eq!(Value::Varchar(None).zero(), Value::Varchar(Some("".into())));
        assert_eq!(Value::Float32(Some(1.5)).as_null(), Value::Float32(None));
        assert!(Value::Int64(None).is_null());
        assert!(Value::Null.is_null());
        assert!(!Value::Int64(Some(0)).is_null());
        assert!(!Value::Null.is_supported());
        assert!(Value::Varchar(Some("a".into())).same_type(&Value::Varchar(None)));
        assert_ne!(Value::Int32(Some(1)), Value::Int64(Some(1)));
    }

    #[test]
    fn test_erased_values() {
        let value = Value::from_erased(&Value::Int32(None), false, Box::new(5i32)).unwrap();
        assert_eq!(value, Value::Int32(Some(5)));

        let value = Value::from_erased(
            &Value::Varchar(None),
            true,
            Box::new(None::<String>) as Box<dyn Any>,
        )
        .unwrap();
        assert_eq!(value, Value::Varchar(Some("".into())));

        assert!(Value::from_erased(&Value::Int32(None), false, Box::new(5i64)).is_err());
        assert!(Value::from_erased(&Value::Null, false, Box::new(5i32)).is_err());

        let erased = Value::Int64(Some(8))
            .into_erased(&Value::Int16(None), false)
            .unwrap();
        assert_eq!(*erased.downcast::<i16>().unwrap(), 8);

        let erased = Value::Null.into_erased(&Value::Boolean(None), true).unwrap();
        assert_eq!(*erased.downcast::<Option<bool>>().unwrap(), None);

        let erased = Value::Null.into_erased(&Value::Float64(None), false).unwrap();
        assert_eq!(*erased.downcast::<f64>().unwrap(), 0.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Int32(Some(-4)).to_string(), "-4");
        assert_eq!(Value::Boolean(Some(true)).to_string(), "true");
        assert_eq!(Value::Varchar(Some("it's".into())).to_string(), "'it''s'");
        assert_eq!(Value::Varchar(None).to_string(), "NULL");
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::from(Some(2.5f64)).to_string(), "2.5");
        assert_eq!(Value::from(None::<i8>), Value::Int8(None));
        assert_eq!(Value::from("abc"), Value::Varchar(Some("abc".into())));
    }

    #[test]
    fn test_identity_hash() {
        assert_eq!(identity_hash(""), 0);
        assert_eq!(identity_hash("a"), 97);
        assert_eq!(identity_hash("id"), 3355);
        assert_eq!(identity_hash("hello"), 99162322);
        assert_eq!(identity_hash("first_name"), identity_hash("first_name"));
        assert_ne!(identity_hash("first_name"), identity_hash("last_name"));
    }

    #[test]
    fn test_classify() {
        let fault = Fault::classify(Fault::NotInitialized.into());
        assert_eq!(fault, Fault::NotInitialized);

        let error = anyhow::Error::msg("no such table: people").context("While preparing");
        assert_eq!(
            Fault::classify(error),
            Fault::BackendExecutionFailure {
                message: "While preparing: no such table: people".into()
            }
        );
    }
}
