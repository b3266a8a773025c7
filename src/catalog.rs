//! Ready-made goal definitions for Instagram's web UI
//!
//! One place for every candidate selector list the workflow needs, ranked
//! narrow-to-broad so that the most specific selector wins when the page
//! still matches it and a broader fallback takes over after markup drift.
//! Obfuscated class-name selectors (the `_acan _acao` family) rotate too
//! often to be worth carrying; attribute and structural selectors age far
//! better.

use crate::resolver::{Effect, Goal, StatePolicy, Strategy};

/// Instagram web origin
pub const BASE_URL: &str = "https://www.instagram.com";

/// URL of the login page
pub fn login_url() -> String {
    format!("{}/accounts/login/", BASE_URL)
}

/// URL of a profile page
pub fn profile_url(username: &str) -> String {
    format!("{}/{}/", BASE_URL, username)
}

/// The username field on the login page
pub fn login_username() -> Goal {
    Goal::new("login-username", Strategy::css("input[name='username']"))
        .strategy(Strategy::css(
            "input[aria-label='Phone number, username, or email']",
        ))
        .strategy(Strategy::css("form input[type='text']"))
}

/// The password field on the login page
pub fn login_password() -> Goal {
    Goal::new("login-password", Strategy::css("input[name='password']"))
        .strategy(Strategy::css("input[aria-label='Password']"))
        .strategy(Strategy::css("form input[type='password']"))
}

/// The submit button on the login page
pub fn login_submit() -> Goal {
    Goal::new("login-submit", Strategy::css("button[type='submit']"))
        .strategy(Strategy::css("form button").with_text("Log in"))
        .strategy(Strategy::css("form button").with_text("Log In"))
}

/// The credential-error banner shown after a failed login attempt
pub fn login_error_banner() -> Goal {
    Goal::new(
        "login-error-banner",
        Strategy::css("div[role='alert']"),
    )
    .strategy(Strategy::css("form ~ div").with_text("Sorry, your password was incorrect"))
    .strategy(Strategy::css("form div").with_text("incorrect"))
}

/// The follow/unfollow toggle on a profile page.
///
/// The policy both rejects the neighbouring "Message" button and classifies
/// the relationship state, so following an already-followed account is a
/// no-op rather than an accidental unfollow.
pub fn follow_button() -> Goal {
    Goal::new("follow-button", Strategy::css("header section button"))
        .strategy(Strategy::css("header button"))
        .strategy(Strategy::css("main button").with_text("Follow"))
        .with_policy(
            StatePolicy::on_text()
                .state("Follow", Effect::Act)
                .state("Follow Back", Effect::Act)
                .state("Following", Effect::Noop)
                .state("Requested", Effect::Noop),
        )
}

/// Link to the most recent post in a profile's grid.
///
/// Both selectors pin the first cell structurally; a bare `a[href^='/p/']`
/// would match the whole grid and correctly come back ambiguous.
pub fn recent_post_link() -> Goal {
    Goal::new(
        "recent-post-link",
        Strategy::css("article div:first-child div:first-child a"),
    )
    .strategy(Strategy::css("main article a[href^='/p/']:first-of-type"))
}

/// The like toggle inside an opened post.
///
/// State lives on the heart icon's `aria-label`; the policy filters out the
/// Comment/Share/Save icons sharing the same section and classifies
/// already-liked posts as no-ops. Clicking the icon bubbles to its button.
pub fn like_toggle() -> Goal {
    Goal::new(
        "like-toggle",
        Strategy::css("article section svg[aria-label]"),
    )
    .strategy(Strategy::css("section svg[aria-label]"))
    .with_policy(
        StatePolicy::on_attribute("aria-label")
            .state("Like", Effect::Act)
            .state("Unlike", Effect::Noop),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ElementSnapshot;
    use crate::resolver::Effect;

    #[test]
    fn test_urls() {
        assert_eq!(login_url(), "https://www.instagram.com/accounts/login/");
        assert_eq!(profile_url("rustlang"), "https://www.instagram.com/rustlang/");
    }

    #[test]
    fn test_goals_rank_narrow_to_broad() {
        let goal = login_username();
        assert_eq!(goal.name(), "login-username");
        assert!(goal.strategies().len() >= 2);
        // Highest-confidence selector first
        assert_eq!(
            goal.strategies()[0].selector.query(),
            "input[name='username']"
        );
    }

    #[test]
    fn test_follow_policy_states() {
        let goal = follow_button();
        let policy = goal.policy().expect("follow goal carries a policy");

        assert_eq!(
            policy.classify(&ElementSnapshot::new("Follow")),
            Some(Effect::Act)
        );
        assert_eq!(
            policy.classify(&ElementSnapshot::new("Following")),
            Some(Effect::Noop)
        );
        assert_eq!(
            policy.classify(&ElementSnapshot::new("Requested")),
            Some(Effect::Noop)
        );
        assert_eq!(policy.classify(&ElementSnapshot::new("Message")), None);
    }

    #[test]
    fn test_like_policy_reads_aria_label() {
        let goal = like_toggle();
        let policy = goal.policy().expect("like goal carries a policy");

        let like = ElementSnapshot::new("").with_attribute("aria-label", "Like");
        let unlike = ElementSnapshot::new("").with_attribute("aria-label", "Unlike");
        let comment = ElementSnapshot::new("").with_attribute("aria-label", "Comment");

        assert_eq!(policy.classify(&like), Some(Effect::Act));
        assert_eq!(policy.classify(&unlike), Some(Effect::Noop));
        assert_eq!(policy.classify(&comment), None);
    }

    #[test]
    fn test_login_goals_have_no_policy() {
        assert!(login_username().policy().is_none());
        assert!(login_password().policy().is_none());
    }
}
