//! Serde tests for the wire format of core types.
//!
//! The JSON shapes here are what API clients and the record store see.

use chrono::{TimeZone, Utc};
use serde_json::json;

use crate::{CaptchaOrErrorResult, CompanyRecord};

fn sample_record() -> CompanyRecord {
    CompanyRecord {
        name: "北京示例科技有限公司".to_string(),
        reg_number: "91110108MA01ABCD2X".to_string(),
        legal_rep: "张三".to_string(),
        capital: "1000万元人民币".to_string(),
        established: "2018-03-15".to_string(),
        timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap()
            + chrono::Duration::milliseconds(123),
    }
}

// ============================================================================
// CompanyRecord
// ============================================================================

#[test]
fn test_record_uses_camel_case_keys() {
    let value = serde_json::to_value(sample_record()).unwrap();
    assert_eq!(
        value,
        json!({
            "name": "北京示例科技有限公司",
            "regNumber": "91110108MA01ABCD2X",
            "legalRep": "张三",
            "capital": "1000万元人民币",
            "established": "2018-03-15",
            "timestamp": "2024-05-01T08:30:00.123Z"
        })
    );
}

#[test]
fn test_record_accepts_offset_timestamps() {
    let json = r#"{
        "name": "a", "regNumber": "b", "legalRep": "c",
        "capital": "d", "established": "e",
        "timestamp": "2024-05-01T16:30:00.123+08:00"
    }"#;
    let record = CompanyRecord::from_json(json).unwrap();
    assert_eq!(record.timestamp, sample_record().timestamp);
}

#[test]
fn test_record_rejects_bad_timestamp() {
    let json = r#"{
        "name": "a", "regNumber": "b", "legalRep": "c",
        "capital": "d", "established": "e", "timestamp": "yesterday"
    }"#;
    assert!(CompanyRecord::from_json(json).is_err());
}

#[test]
fn test_record_json_helpers_agree() {
    let record = sample_record();
    let stored = record.to_json().unwrap();
    assert_eq!(CompanyRecord::from_json(&stored).unwrap(), record);
}

// ============================================================================
// CaptchaOrErrorResult
// ============================================================================

#[test]
fn test_captcha_result_omits_absent_fields() {
    let result = CaptchaOrErrorResult {
        captcha_required: true,
        captcha_image: None,
        message: None,
    };
    assert_eq!(
        serde_json::to_value(result).unwrap(),
        json!({"captchaRequired": true})
    );
}

#[test]
fn test_captcha_result_with_image() {
    let result = CaptchaOrErrorResult::captcha("Slider verification required")
        .with_image(Some("https://example.com/captcha.png".to_string()));
    assert_eq!(
        serde_json::to_value(result).unwrap(),
        json!({
            "captchaRequired": true,
            "captchaImage": "https://example.com/captcha.png",
            "message": "Slider verification required"
        })
    );
}

#[test]
fn test_no_data_is_not_captcha() {
    let result = CaptchaOrErrorResult::no_data("No matching company");
    assert!(!result.captcha_required);
    assert_eq!(result.message.as_deref(), Some("No matching company"));
}
