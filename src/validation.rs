//! Form validation and conversion into the prediction request body

use crate::error::ValidationError;
use crate::types::{LaptopForm, PredictRequest};

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_integer(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

/// First violated rule of `form`, checked in order: identity fields, screen size, RAM, weight.
pub fn validate_form(form: &LaptopForm) -> Result<(), ValidationError> {
    if [&form.company, &form.product, &form.type_name]
        .iter()
        .any(|v| v.trim().is_empty())
    {
        return Err(ValidationError::MissingIdentity);
    }
    if parse_number(&form.inches).is_none() {
        return Err(ValidationError::InvalidScreenSize);
    }
    if parse_integer(&form.ram).is_none() {
        return Err(ValidationError::InvalidRam);
    }
    if parse_number(&form.weight).is_none() {
        return Err(ValidationError::InvalidWeight);
    }
    Ok(())
}

/// Validate `form` and build the typed body sent to `/predict`.
pub fn to_request(form: &LaptopForm) -> Result<PredictRequest, ValidationError> {
    validate_form(form)?;
    Ok(PredictRequest {
        company: form.company.clone(),
        product: form.product.clone(),
        type_name: form.type_name.clone(),
        inches: parse_number(&form.inches).ok_or(ValidationError::InvalidScreenSize)?,
        screen_resolution: form.screen_resolution.clone(),
        cpu: form.cpu.clone(),
        ram: parse_integer(&form.ram).ok_or(ValidationError::InvalidRam)?,
        memory: form.memory.clone(),
        gpu: form.gpu.clone(),
        op_sys: form.op_sys.clone(),
        weight: parse_number(&form.weight).ok_or(ValidationError::InvalidWeight)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> LaptopForm {
        LaptopForm {
            company: "Dell".into(),
            product: "XPS 13".into(),
            type_name: "Ultrabook".into(),
            inches: "13.3".into(),
            screen_resolution: "1920x1080".into(),
            cpu: "Intel Core i7".into(),
            ram: "16".into(),
            memory: "512GB SSD".into(),
            gpu: "Intel Iris".into(),
            op_sys: "Windows 10".into(),
            weight: "1.2".into(),
        }
    }

    #[test]
    fn valid_form_passes_and_converts() {
        let form = valid_form();
        assert_eq!(validate_form(&form), Ok(()));

        let request = to_request(&form).unwrap();
        assert_eq!(request.inches, 13.3);
        assert_eq!(request.ram, 16);
        assert_eq!(request.weight, 1.2);
        assert_eq!(request.op_sys, "Windows 10");
    }

    #[test]
    fn missing_identity_fields_are_reported_first() {
        for blank in ["company", "product", "type_name"] {
            let mut form = valid_form();
            form.ram = "lots".into();
            match blank {
                "company" => form.company.clear(),
                "product" => form.product = "  ".into(),
                _ => form.type_name.clear(),
            }
            assert_eq!(validate_form(&form), Err(ValidationError::MissingIdentity));
        }
    }

    #[test]
    fn numeric_rules_are_checked_in_order() {
        let mut form = valid_form();
        form.inches = "big".into();
        form.weight = String::new();
        assert_eq!(validate_form(&form), Err(ValidationError::InvalidScreenSize));

        let mut form = valid_form();
        form.ram = String::new();
        assert_eq!(validate_form(&form), Err(ValidationError::InvalidRam));

        let mut form = valid_form();
        form.ram = "8.5".into();
        assert_eq!(validate_form(&form), Err(ValidationError::InvalidRam));

        let mut form = valid_form();
        form.weight = "heavy".into();
        assert_eq!(validate_form(&form), Err(ValidationError::InvalidWeight));
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let mut form = valid_form();
        form.inches = "NaN".into();
        assert_eq!(validate_form(&form), Err(ValidationError::InvalidScreenSize));

        let mut form = valid_form();
        form.weight = "inf".into();
        assert_eq!(to_request(&form), Err(ValidationError::InvalidWeight));
    }
}
