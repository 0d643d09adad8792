use crate::structs::change_record::ChangeRecord;
use crate::structs::code_analysis_result::CodeAnalysisResult;
use crate::structs::spec_analysis_result::SpecAnalysisResult;

pub fn generate_code_prompt(old_code: &str, new_code: &str, firmware_type: Option<&str>, analysis_depth: &str) -> String {
    format!(
        "FIRMWARE TYPE: {}\nANALYSIS DEPTH: {}\n\nOLD CODE:\n{}\n\nNEW CODE:\n{}\n",
        firmware_type.unwrap_or("Unknown"),
        analysis_depth,
        number_lines(old_code),
        number_lines(new_code)
    )
}

pub fn generate_spec_prompt(old_spec: &str, new_spec: &str) -> String {
    format!("OLD SPECIFICATION:\n{}\n\nNEW SPECIFICATION:\n{}\n", old_spec, new_spec)
}

/// Lists both change sets under the `C<n>` / `S<n>` identifiers the correlator resolves against.
pub fn generate_compliance_prompt(code: &CodeAnalysisResult, spec: &SpecAnalysisResult) -> String {
    let mut prompt = String::from("CODE CHANGES:\n");
    for (index, record) in code.differences.iter().enumerate() {
        prompt.push_str(&describe_record(&format!("C{}", index + 1), record));
    }
    if !code.security_findings.is_empty() {
        prompt.push_str("\nCODE SECURITY FINDINGS (context only, not identifiers):\n");
        for finding in &code.security_findings {
            prompt.push_str(&format!(
                "- [{}] {:?}: {}\n",
                finding.severity, finding.category, finding.description
            ));
        }
    }

    prompt.push_str("\nSPECIFICATION CHANGES:\n");
    for (index, record) in spec.differences.iter().enumerate() {
        prompt.push_str(&describe_record(&format!("S{}", index + 1), record));
    }
    prompt
}

fn describe_record(id: &str, record: &ChangeRecord) -> String {
    let mut text = format!(
        "{} [{}] {:?}: {}\n",
        id, record.locator, record.change_type, record.description
    );
    if let Some(old) = record.old_content.as_deref().filter(|c| !c.trim().is_empty()) {
        text.push_str(&format!("    old: {}\n", old.trim()));
    }
    if let Some(new) = record.new_content.as_deref().filter(|c| !c.trim().is_empty()) {
        text.push_str(&format!("    new: {}\n", new.trim()));
    }
    text
}

fn number_lines(text: &str) -> String {
    if text.is_empty() {
        return "(empty)".to_string();
    }
    text.lines()
        .enumerate()
        .map(|(i, line)| format!("{:>5} | {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}
