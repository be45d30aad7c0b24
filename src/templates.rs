use chrono::{DateTime, TimeZone};
use tera::Tera;

use crate::config::{Deployment, TEXT_COLOR};
use crate::error::AppError;

const STATUS_TEMPLATE: &str = "status.html";

/// Format used for the page timestamp, e.g. "10/19/2026, 3:04:05 PM"
const LOCAL_TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Initialize the Tera template engine
///
/// The status template is compiled into the binary so the container image needs
/// no template directory. Autoescaping is disabled: the page shows the
/// operator-supplied values exactly as given.
pub fn init_templates() -> Result<Tera, AppError> {
    let mut tera = Tera::default();
    tera.add_raw_template(STATUS_TEMPLATE, include_str!("../templates/status.html"))?;
    tera.autoescape_on(vec![]);
    Ok(tera)
}

/// Render the status page for a deployment.
pub fn render_status_page(
    tera: &Tera,
    deployment: &Deployment,
    hostname: &str,
    timestamp: &str,
) -> Result<String, AppError> {
    let mut context = tera::Context::new();
    context.insert("deployment", deployment);
    context.insert("background", deployment.status_color().background());
    context.insert("text_color", TEXT_COLOR);
    context.insert("hostname", hostname);
    context.insert("timestamp", timestamp);

    Ok(tera.render(STATUS_TEMPLATE, &context)?)
}

/// Human-readable local time for the status page
pub fn local_timestamp<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    now.format(LOCAL_TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BLUE_BACKGROUND, GREEN_BACKGROUND};
    use chrono::Utc;

    fn deployment(version: &str, color: &str, name: &str) -> Deployment {
        Deployment {
            version: version.to_string(),
            color: color.to_string(),
            name: name.to_string(),
        }
    }

    fn render(deployment: &Deployment) -> String {
        let tera = init_templates().unwrap();
        render_status_page(&tera, deployment, "web-1", "1/2/2026, 3:04:05 PM").unwrap()
    }

    #[test]
    fn test_render_staging_green() {
        let html = render(&deployment("1.0", "green", "Staging"));
        assert!(html.contains("Staging"));
        assert!(html.contains("Version 1.0"));
        assert!(html.contains("Environment: GREEN"));
        assert!(html.contains("Container: web-1"));
        assert!(html.contains("Timestamp: 1/2/2026, 3:04:05 PM"));
        assert!(html.contains(GREEN_BACKGROUND));
        assert!(!html.contains(BLUE_BACKGROUND));
    }

    #[test]
    fn test_render_blue() {
        let html = render(&deployment("1.0", "blue", "Default Environment"));
        assert!(html.contains(&format!("{} 0%", BLUE_BACKGROUND)));
        assert!(html.contains(&format!("{}dd 100%", BLUE_BACKGROUND)));
        assert!(!html.contains(GREEN_BACKGROUND));
        assert!(html.contains("Environment: BLUE"));
    }

    #[test]
    fn test_any_non_blue_color_renders_green() {
        for color in ["green", "red", "Blue", "purple"] {
            let html = render(&deployment("1.0", color, "x"));
            assert!(html.contains(GREEN_BACKGROUND), "{color}");
        }
    }

    #[test]
    fn test_values_are_not_escaped() {
        let html = render(&deployment("1.0", "blue", "<b>Canary</b> & co"));
        assert!(html.contains("<b>Canary</b> & co"));
    }

    #[test]
    fn test_local_timestamp_format() {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 15, 4, 5).unwrap();
        assert_eq!(local_timestamp(&at), "10/19/2026, 3:04:05 PM");

        let morning = Utc.with_ymd_and_hms(2026, 1, 2, 0, 30, 0).unwrap();
        assert_eq!(local_timestamp(&morning), "1/2/2026, 12:30:00 AM");
    }
}
