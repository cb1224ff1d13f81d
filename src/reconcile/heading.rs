//! Heading versus course over ground.

use crate::geo;
use crate::peripherals::OperatorPrompt;

/// Up to this delta, heading and course are taken as they are.
pub const ACCEPT_DEG: f64 = 20.0;

/// Beyond this delta, heading is forced to course without asking.
pub const FORCE_DEG: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeadingCheck {
    Accept,
    Ask,
    Force,
}

pub fn classify(cog: f64, heading: f64) -> HeadingCheck {
    let delta = geo::angular_delta(cog, heading);
    if delta <= ACCEPT_DEG {
        HeadingCheck::Accept
    } else if delta > FORCE_DEG {
        HeadingCheck::Force
    } else {
        HeadingCheck::Ask
    }
}

/// Settles the heading to log. Asks the operator at most once.
///
/// A confirmed bearing is used as given unless it is still more than
/// [`FORCE_DEG`] off course. An unusable or cancelled answer forces
/// heading to course.
pub async fn resolve(cog: f64, heading: f64, prompt: &dyn OperatorPrompt) -> f64 {
    match classify(cog, heading) {
        HeadingCheck::Accept => heading,
        HeadingCheck::Force => {
            tracing::debug!(cog, heading, "heading forced to course");
            cog
        }
        HeadingCheck::Ask => {
            let message = format!(
                "Heading {heading:03.0}° differs from COG {cog:03.0}°. Confirm heading (0-359)"
            );
            let answer = prompt.ask(&message).await;
            match answer.as_deref().and_then(parse_bearing) {
                Some(confirmed) if classify(cog, confirmed) != HeadingCheck::Force => confirmed,
                Some(confirmed) => {
                    tracing::debug!(cog, confirmed, "confirmed heading still off, forced");
                    cog
                }
                None => {
                    tracing::debug!(?answer, "no usable heading confirmation");
                    cog
                }
            }
        }
    }
}

fn parse_bearing(text: &str) -> Option<f64> {
    let value: f64 = text.trim().parse().ok()?;
    (0.0..=359.0).contains(&value).then_some(value)
}
