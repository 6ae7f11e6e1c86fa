use cardvantage_client::ClientError;

const USER_ERROR_HEADLINE: &str = "That request could not be completed.";
const INTERNAL_ERROR_HEADLINE: &str = "CardVantage hit a problem with its local profile.";

pub fn render_error(error: &ClientError) -> String {
    let headline = if error.is_internal() {
        INTERNAL_ERROR_HEADLINE
    } else {
        USER_ERROR_HEADLINE
    };

    let mut lines = vec![
        headline.to_string(),
        String::new(),
        format!("  Error:    {}", error.code),
        format!("  Details:  {}", error.message),
        String::new(),
        "Next steps:".to_string(),
    ];

    let steps: Vec<&str> = if error.recovery_steps.is_empty() {
        vec!["Retry the command."]
    } else {
        error.recovery_steps.iter().map(String::as_str).collect()
    };
    lines.extend(
        steps
            .iter()
            .enumerate()
            .map(|(index, step)| format!("  {}. {step}", index + 1)),
    );

    lines.join("\n")
}
