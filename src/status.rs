//! `/status <username>`: a GitHub profile summary, posted in channel.

use crate::{
    github::User,
    router::Deps,
    slack::command::Reply,
};
use tracing::{error, info};

/// Look a user up and summarise them for the whole channel. Lookup failures
/// are only shown to the invoker.
pub async fn status_reply(deps: &Deps, username: &str) -> Reply {
    info!("Looking up GitHub user {}", username);

    match deps.github.fetch_user(username).await {
        Ok(user) => Reply::in_channel(fmt_status(&user)),
        Err(e) => {
            error!("Failed to look up GitHub user {}: {}", username, e);
            Reply::failure(format!("Could not load user `{}`.\n> {}", username, e))
        }
    }
}

/// Render a [User] in Slack's mrkdwn.
fn fmt_status(user: &User) -> String {
    format!(
        ":bar_chart: *{}* (`{}`)\n\
         - :card_index_dividers: Public Repos: {}\n\
         - :busts_in_silhouette: Followers: {}\n\
         - :receipt: Bio: {}\n\
         - :link: <{}|View GitHub profile>",
        user.display_name(),
        user.login,
        user.public_repos,
        user.followers,
        user.bio_or_placeholder(),
        user.html_url,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_status() {
        let user = User {
            login: "octocat".into(),
            name: "The Octocat".into(),
            public_repos: 8,
            followers: 100,
            bio: "Meow".into(),
            html_url: "https://github.com/octocat".into(),
        };

        assert_eq!(
            fmt_status(&user),
            ":bar_chart: *The Octocat* (`octocat`)\n\
             - :card_index_dividers: Public Repos: 8\n\
             - :busts_in_silhouette: Followers: 100\n\
             - :receipt: Bio: Meow\n\
             - :link: <https://github.com/octocat|View GitHub profile>"
        );
    }

    #[test]
    fn test_fmt_status_fallbacks() {
        let user = User {
            login: "octocat".into(),
            html_url: "https://github.com/octocat".into(),
            ..Default::default()
        };

        let text = fmt_status(&user);

        assert!(text.starts_with(":bar_chart: *octocat* (`octocat`)\n"));
        assert!(text.contains("Bio: no bio\n"));
        assert!(text.contains("Public Repos: 0\n"));
    }
}
