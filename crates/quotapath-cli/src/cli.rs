//! Command-line argument parsing.

use anyhow::{anyhow, bail, Context, Result};
use quotapath_core::models::{DealQuery, DealStage, DealStatus};

pub const USAGE: &str = "\
Usage: quotapath [command]

Commands:
  dashboard                    Deal and commission metrics (default)
  deals [--status S] [--stage S] [--owner ID]
                               List deals, optionally filtered
  commissions                  Commission list and summary
  calculate [DEAL_ID...]       Calculate commissions (all closed deals if none given)
  nav                          Sections available to your role
  whoami                       Show the signed-in user
  login [USERNAME]             Sign in
  logout                       Sign out
  help                         Show this message

Environment:
  QUOTAPATH_API_URL            Backend base URL
  QUOTAPATH_STORAGE            Session storage: file or keyring
  QUOTAPATH_LOG_DIR            Write logs to a daily file in this directory
  RUST_LOG                     Log filter (default: warn)";

/// Commands that only run with a logged-in session.
#[derive(Debug, Clone)]
pub enum View {
    Dashboard,
    Deals { query: DealQuery },
    Commissions,
    Calculate { deal_ids: Vec<i64> },
    Nav,
}

#[derive(Debug, Clone)]
pub enum Command {
    View(View),
    WhoAmI,
    Login { username: Option<String> },
    Logout,
    Help,
}

pub fn parse<I>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let Some(name) = args.next() else {
        return Ok(Command::View(View::Dashboard));
    };
    let rest: Vec<String> = args.collect();

    let command = match name.as_str() {
        "dashboard" => Command::View(View::Dashboard),
        "deals" => Command::View(View::Deals {
            query: parse_deal_query(&rest)?,
        }),
        "commissions" => Command::View(View::Commissions),
        "calculate" => Command::View(View::Calculate {
            deal_ids: rest
                .iter()
                .map(|id| {
                    id.parse::<i64>()
                        .with_context(|| format!("Invalid deal id: {}", id))
                })
                .collect::<Result<_>>()?,
        }),
        "nav" => Command::View(View::Nav),
        "whoami" => Command::WhoAmI,
        "login" => Command::Login {
            username: rest.first().cloned(),
        },
        "logout" => Command::Logout,
        "help" | "--help" | "-h" => Command::Help,
        other => bail!("Unknown command: {}", other),
    };

    let takes_args = matches!(
        command,
        Command::View(View::Deals { .. } | View::Calculate { .. }) | Command::Login { .. }
    );
    if !takes_args && !rest.is_empty() {
        bail!("Unexpected argument: {}", rest[0]);
    }
    if matches!(command, Command::Login { .. }) && rest.len() > 1 {
        bail!("Unexpected argument: {}", rest[1]);
    }
    Ok(command)
}

fn parse_deal_query(args: &[String]) -> Result<DealQuery> {
    let mut query = DealQuery::default();
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .ok_or_else(|| anyhow!("Missing value for {}", flag))?;
        match flag.as_str() {
            "--status" => query.status = Some(DealStatus::from(value.as_str())),
            "--stage" => query.stage = Some(DealStage::from(value.as_str())),
            "--owner" => {
                query.owner = Some(
                    value
                        .parse()
                        .with_context(|| format!("Invalid owner id: {}", value))?,
                )
            }
            other => bail!("Unknown option for deals: {}", other),
        }
    }
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(args: &[&str]) -> Result<Command> {
        parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_default_is_dashboard() {
        assert!(matches!(
            parse_args(&[]).unwrap(),
            Command::View(View::Dashboard)
        ));
    }

    #[test]
    fn test_deals_filters() {
        match parse_args(&["deals", "--status", "closed_won", "--owner", "7"]).unwrap() {
            Command::View(View::Deals { query }) => {
                assert_eq!(query.status, Some(DealStatus::ClosedWon));
                assert_eq!(query.owner, Some(7));
                assert!(query.stage.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(parse_args(&["deals", "--status"]).is_err());
        assert!(parse_args(&["deals", "--color", "red"]).is_err());
    }

    #[test]
    fn test_calculate_ids() {
        match parse_args(&["calculate", "4", "9"]).unwrap() {
            Command::View(View::Calculate { deal_ids }) => assert_eq!(deal_ids, vec![4, 9]),
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(parse_args(&["calculate", "four"]).is_err());
    }

    #[test]
    fn test_login_and_extra_args() {
        match parse_args(&["login", "jdoe"]).unwrap() {
            Command::Login { username } => assert_eq!(username.as_deref(), Some("jdoe")),
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(parse_args(&["login", "a", "b"]).is_err());
        assert!(parse_args(&["logout", "now"]).is_err());
        assert!(parse_args(&["frobnicate"]).is_err());
    }

    #[test]
    fn test_session_commands_are_views() {
        assert!(matches!(
            parse_args(&["nav"]).unwrap(),
            Command::View(View::Nav)
        ));
        assert!(matches!(
            parse_args(&["commissions"]).unwrap(),
            Command::View(View::Commissions)
        ));
        assert!(matches!(parse_args(&["whoami"]).unwrap(), Command::WhoAmI));
        assert!(matches!(parse_args(&["logout"]).unwrap(), Command::Logout));
    }
}
