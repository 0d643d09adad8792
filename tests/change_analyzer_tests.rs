use spectrace::enums::ai_provider_error::AiProviderError;
use spectrace::enums::change_kind::ChangeKind;
use spectrace::enums::finding_category::FindingCategory;
use spectrace::enums::locator::Locator;
use spectrace::enums::severity::Severity;
use spectrace::errors::SpectraceError;
use spectrace::services::change_analyzer::ChangeAnalyzer;
use spectrace::structs::compare_code_request::CompareCodeRequest;
use spectrace::structs::compare_specs_request::CompareSpecsRequest;
use crate::common::{adapter, ScriptedProvider};

const OLD_BLINK: &str = "void loop() {\n  digitalWrite(LED, HIGH);\n  delay(1000);\n  digitalWrite(LED, LOW);\n  delay(1000);\n}\n";
const NEW_BLINK: &str = "void loop() {\n  digitalWrite(LED, HIGH);\n  delay(500);\n  digitalWrite(LED, LOW);\n  delay(500);\n}\n";

const BLINK_REPLY: &str = r#"{
  "differences": [
    {"line_number": 3, "change_type": "modified", "old_content": "  delay(1000);", "new_content": "  delay(500);", "description": "On time halved"},
    {"line_number": 5, "change_type": "modified", "old_content": "  delay(1000);", "new_content": "  delay(500);", "description": "Off time halved"}
  ],
  "security_findings": [],
  "risk_assessment": "low",
  "summary": "Blink frequency doubled from 0.5 Hz to 1 Hz.",
  "major_changes": ["LED blink period reduced to 1s"],
  "recommendations": []
}"#;

#[tokio::test]
async fn led_blink_change_is_located_by_line() {
    let provider = ScriptedProvider::replying(&[BLINK_REPLY]);
    let analyzer = ChangeAnalyzer::new(adapter(provider.clone()));
    let request = CompareCodeRequest::new(OLD_BLINK.into(), NEW_BLINK.into(), Some("arduino".into()));

    let result = analyzer.compare_code(&request).await.unwrap();

    assert_eq!(result.differences.len(), 2);
    assert_eq!(result.differences[0].locator, Locator::Line(3));
    assert_eq!(result.differences[0].change_type, ChangeKind::Modified);
    assert_eq!(result.risk_assessment, Severity::Low);
    assert!(result.security_findings.is_empty());

    let metadata = &result.analysis_metadata;
    assert_eq!(metadata.total_changes, 2);
    assert_eq!(metadata.attempts, 1);
    assert_eq!(metadata.provider.as_deref(), Some("scripted"));
    assert_eq!(metadata.firmware_type.as_deref(), Some("arduino"));
    assert_eq!(metadata.old_length, OLD_BLINK.len());
    assert!(!metadata.identical_input);

    let prompts = provider.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("delay(500)"));
    assert!(prompts[0].contains("arduino"));
}

#[tokio::test]
async fn authentication_bypass_is_reported_as_critical_finding() {
    let reply = r#"```json
{
  "differences": [
    {"line_number": 14, "change_type": "added", "new_content": "  if (strcmp(user, \"debug\") == 0) return AUTH_OK;", "description": "Hardcoded debug login"}
  ],
  "security_findings": [
    {"category": "authentication_bypass", "severity": "critical", "location": "line 14",
     "description": "A fixed username skips password verification",
     "code_snippet": "if (strcmp(user, \"debug\") == 0) return AUTH_OK;",
     "recommendation": "Remove the debug login path"}
  ],
  "risk_assessment": "critical",
  "summary": "A backdoor login was introduced.",
  "major_changes": ["Debug login bypasses authentication"],
  "recommendations": ["Remove the debug login before release"]
}
```"#;
    let provider = ScriptedProvider::replying(&[reply]);
    let analyzer = ChangeAnalyzer::new(adapter(provider));
    let request = CompareCodeRequest::new(
        "int auth(const char *user, const char *pw) {\n  return check(user, pw);\n}\n".into(),
        "int auth(const char *user, const char *pw) {\n  if (strcmp(user, \"debug\") == 0) return AUTH_OK;\n  return check(user, pw);\n}\n".into(),
        None,
    );

    let result = analyzer.compare_code(&request).await.unwrap();

    assert_eq!(result.risk_assessment, Severity::Critical);
    assert_eq!(result.security_findings.len(), 1);
    assert_eq!(result.security_findings[0].category, FindingCategory::AuthenticationBypass);
    assert_eq!(result.security_findings[0].severity, Severity::Critical);
    assert_eq!(result.differences[0].change_type, ChangeKind::Added);
    assert!(result.differences[0].old_content.is_none());
}

#[tokio::test]
async fn transient_service_failure_is_retried() {
    let provider = ScriptedProvider::new(vec![
        Err(AiProviderError::ServerError { status: 503, message: "overloaded".into() }),
        Ok(BLINK_REPLY.to_string()),
    ]);
    let analyzer = ChangeAnalyzer::new(adapter(provider.clone()));
    let request = CompareCodeRequest::new(OLD_BLINK.into(), NEW_BLINK.into(), None);

    let result = analyzer.compare_code(&request).await.unwrap();

    assert_eq!(provider.calls(), 2);
    assert_eq!(result.analysis_metadata.attempts, 2);
}

#[tokio::test]
async fn exhausted_retries_surface_as_retryable_transport_error() {
    let provider = ScriptedProvider::new(vec![
        Err(AiProviderError::Timeout(5)),
        Err(AiProviderError::NetworkError("connection reset".into())),
    ]);
    let analyzer = ChangeAnalyzer::new(adapter(provider.clone()));
    let request = CompareCodeRequest::new(OLD_BLINK.into(), NEW_BLINK.into(), None);

    let err = analyzer.compare_code(&request).await.unwrap_err();

    assert_eq!(provider.calls(), 2);
    match err {
        SpectraceError::UpstreamTransportError { attempts, retryable, .. } => {
            assert_eq!(attempts, 2);
            assert!(retryable);
        }
        other => panic!("expected upstream_transport_error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_answer_is_a_contract_violation_and_not_retried() {
    let reply = r#"{"differences": [], "security_findings": [], "risk_assessment": "severe",
        "summary": "", "major_changes": [], "recommendations": []}"#;
    let provider = ScriptedProvider::replying(&[reply, BLINK_REPLY]);
    let analyzer = ChangeAnalyzer::new(adapter(provider.clone()));
    let request = CompareCodeRequest::new(OLD_BLINK.into(), NEW_BLINK.into(), None);

    let err = analyzer.compare_code(&request).await.unwrap_err();

    assert_eq!(err.kind(), "analysis_contract_violation");
    assert_eq!(err.http_status(), 502);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn spec_changes_are_located_by_trimmed_section() {
    let reply = r#"{
  "differences": [
    {"section": "  3.2 Timing ", "change_type": "modified", "old_content": "Blink at 0.5 Hz", "new_content": "Blink at 1 Hz", "description": "Faster blink"}
  ],
  "new_features": [{"feature": "Status LED", "description": "Blinks faster when connected", "impact": "low"}],
  "removed_features": [],
  "behavioral_changes": [{"change": "Blink rate", "old_behavior": "0.5 Hz", "new_behavior": "1 Hz"}],
  "risk_level": "low",
  "summary": "Timing section updated.",
  "major_changes": [],
  "recommendations": []
}"#;
    let provider = ScriptedProvider::replying(&[reply]);
    let analyzer = ChangeAnalyzer::new(adapter(provider));
    let request = CompareSpecsRequest {
        old_spec: "3.2 Timing\nBlink at 0.5 Hz\n".into(),
        new_spec: "3.2 Timing\nBlink at 1 Hz\n".into(),
    };

    let result = analyzer.compare_specs(&request).await.unwrap();

    assert_eq!(result.differences[0].locator, Locator::Section("3.2 Timing".into()));
    assert_eq!(result.new_features.len(), 1);
    assert!(result.behavioral_changes[0].security_impact.is_none());
    assert_eq!(result.analysis_metadata.total_changes, 1);
}

#[tokio::test]
async fn delay_loop_rewrite_reports_removed_loop_and_added_timer() {
    let reply = r#"{
  "differences": [
    {"line_number": 4, "change_type": "removed", "old_content": "  for (volatile long i = 0; i < 300000; i++);", "description": "Software delay loop removed"},
    {"line_number": 4, "change_type": "added", "new_content": "  TCCR1B = (1 << WGM12) | (1 << CS12);", "description": "Timer1 configured in CTC mode"}
  ],
  "security_findings": [],
  "risk_assessment": "low",
  "summary": "Busy-wait replaced by a hardware timer.",
  "major_changes": ["Blink timing moved to Timer1"],
  "recommendations": []
}"#;
    let provider = ScriptedProvider::replying(&[reply]);
    let analyzer = ChangeAnalyzer::new(adapter(provider));
    let request = CompareCodeRequest::new(
        "void blink() {\n  PORTB ^= 0x20;\n  // wait\n  for (volatile long i = 0; i < 300000; i++);\n}\n".into(),
        "void blink() {\n  PORTB ^= 0x20;\n  // wait\n  TCCR1B = (1 << WGM12) | (1 << CS12);\n}\n".into(),
        Some("avr".into()),
    );

    let result = analyzer.compare_code(&request).await.unwrap();

    assert!(result.differences.iter().any(|d| d.change_type == ChangeKind::Removed
        && d.old_content.as_deref().is_some_and(|c| c.contains("300000"))));
    assert!(result.differences.iter().any(|d| d.change_type == ChangeKind::Added
        && d.new_content.as_deref().is_some_and(|c| c.contains("TCCR1B"))));
    assert_eq!(result.risk_assessment, Severity::Low);
}

#[tokio::test]
async fn enlarged_auth_buffer_with_early_exit_is_high_severity() {
    let reply = r#"{
  "differences": [
    {"line_number": 2, "change_type": "modified", "old_content": "  char buf[32];", "new_content": "  char buf[128];", "description": "Password buffer enlarged"},
    {"line_number": 5, "change_type": "added", "new_content": "    if (buf[i] == '\\n') break;", "description": "Comparison stops at newline"}
  ],
  "security_findings": [
    {"category": "authentication_bypass", "severity": "high", "location": "line 5",
     "description": "A password starting with a newline compares equal after zero bytes"},
    {"category": "buffer_overflow", "severity": "medium", "location": "line 2",
     "description": "Buffer size no longer matches the stored secret length"}
  ],
  "risk_assessment": "high",
  "summary": "Authentication can be bypassed.",
  "major_changes": [],
  "recommendations": ["Compare the full secret length in constant time"]
}"#;
    let provider = ScriptedProvider::replying(&[reply]);
    let analyzer = ChangeAnalyzer::new(adapter(provider));
    let request = CompareCodeRequest::new("char buf[32];".into(), "char buf[128];".into(), None);

    let result = analyzer.compare_code(&request).await.unwrap();

    assert!(result.security_findings.iter().any(|f| f.severity >= Severity::High
        && matches!(f.category, FindingCategory::AuthenticationBypass | FindingCategory::BufferOverflow)));
    assert!(result.security_findings.iter().all(|f| f.code_snippet.is_none()));
}
