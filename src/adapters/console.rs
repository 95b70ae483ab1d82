//! Console Adapter - Line Commands and Display Strings
//!
//! Parses one command per input line and formats engine results for
//! the terminal. Nothing here touches market state; `usecases::simulator`
//! owns the session and dispatches parsed commands to it.

use std::fmt::Write as _;
use std::str::FromStr;

use thiserror::Error;

use crate::domain::{MarketError, Outcome};
use crate::usecases::session::{MarketSession, SessionSummary, TradeRecord};

/// Help text printed by `help`.
pub const HELP: &str = "\
commands:
  open <b> [price_yes]     open or reset the market (default price 0.50)
  buy <yes|no> <qty>       buy contracts
  quote <yes|no> <qty>     cost of a trade without executing it
  price [yes|no]           current marginal price
  inventory                contracts issued so far
  history                  YES price after every trade
  summary                  session totals
  help                     this text
  quit                     exit";

/// Errors produced while parsing a command line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConsoleError {
    #[error("unknown command `{0}` (try `help`)")]
    UnknownCommand(String),

    #[error("`{command}` expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("`{0}` is not a number")]
    InvalidNumber(String),

    #[error(transparent)]
    Outcome(#[from] MarketError),
}

/// A parsed console command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Open { liquidity: f64, price_yes: f64 },
    Buy { outcome: Outcome, quantity: f64 },
    Quote { outcome: Outcome, quantity: f64 },
    Price(Option<Outcome>),
    Inventory,
    History,
    Summary,
    Help,
    Quit,
}

impl Command {
    /// Parse a single input line. Blank lines yield `Ok(None)`.
    ///
    /// # Errors
    /// Unknown verbs, missing arguments, bad numbers or outcome tags.
    pub fn parse(line: &str) -> Result<Option<Self>, ConsoleError> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "open" | "reset" => {
                let liquidity = number(words.next(), "open", "<b> [price_yes]")?;
                let price_yes = match words.next() {
                    Some(raw) => parse_number(raw)?,
                    None => 0.5,
                };
                Self::Open {
                    liquidity,
                    price_yes,
                }
            }
            "buy" => {
                let (outcome, quantity) = trade_args(&mut words, "buy")?;
                Self::Buy { outcome, quantity }
            }
            "quote" => {
                let (outcome, quantity) = trade_args(&mut words, "quote")?;
                Self::Quote { outcome, quantity }
            }
            "price" => Self::Price(words.next().map(Outcome::from_str).transpose()?),
            "inventory" | "inv" => Self::Inventory,
            "history" => Self::History,
            "summary" => Self::Summary,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(ConsoleError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn trade_args<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
) -> Result<(Outcome, f64), ConsoleError> {
    const EXPECTED: &str = "<yes|no> <quantity>";
    let outcome = words
        .next()
        .ok_or(ConsoleError::MissingArgument {
            command,
            expected: EXPECTED,
        })?
        .parse::<Outcome>()?;
    let quantity = number(words.next(), command, EXPECTED)?;
    Ok((outcome, quantity))
}

fn number(
    raw: Option<&str>,
    command: &'static str,
    expected: &'static str,
) -> Result<f64, ConsoleError> {
    let raw = raw.ok_or(ConsoleError::MissingArgument { command, expected })?;
    parse_number(raw)
}

fn parse_number(raw: &str) -> Result<f64, ConsoleError> {
    raw.parse::<f64>()
        .map_err(|_| ConsoleError::InvalidNumber(raw.to_string()))
}

// ────────────────────────────────────────────
// Display strings
// ────────────────────────────────────────────

/// Inventory rounded to whole contracts.
pub fn format_inventory(q_yes: f64, q_no: f64) -> String {
    format!("YES: {q_yes:.0} | NO: {q_no:.0}")
}

/// Message shown after a market is opened.
pub fn format_open(session: &MarketSession) -> String {
    let (q_yes, q_no) = session.inventory();
    format!(
        "market open (b={}) at {}\ninitial YES price: {:.4}\n{}",
        session.market().liquidity(),
        session.opened_at().format("%H:%M:%S"),
        session.price(Outcome::Yes),
        format_inventory(q_yes, q_no)
    )
}

/// Message shown after a trade.
pub fn format_trade(record: &TradeRecord) -> String {
    format!(
        "trade #{}: bought {} {}\ncost: {:.2}\nnew YES price: {:.4}\n{}",
        record.sequence,
        record.quantity,
        record.outcome,
        record.cost,
        record.price_yes_after,
        format_inventory(record.q_yes, record.q_no)
    )
}

/// Price history, one entry per line with its trade index.
pub fn format_history(history: &[f64]) -> String {
    let mut out = String::new();
    for (i, price) in history.iter().enumerate() {
        let _ = writeln!(out, "{i:>4}  {price:.4}");
    }
    out.trim_end().to_string()
}

pub fn format_summary(summary: &SessionSummary) -> String {
    format!(
        "session {}\nopened: {}\nb: {}\ntrades: {}\ncollected: {:.2}\nC(q): {:.4}\nYES price: {:.4}\n{}",
        summary.session_id,
        summary.opened_at.format("%Y-%m-%d %H:%M:%S UTC"),
        summary.liquidity,
        summary.trade_count,
        summary.total_cost,
        summary.cost_function,
        summary.price_yes,
        format_inventory(summary.q_yes, summary.q_no)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trade_commands() {
        assert_eq!(
            Command::parse("buy yes 2").unwrap(),
            Some(Command::Buy {
                outcome: Outcome::Yes,
                quantity: 2.0
            })
        );
        assert_eq!(
            Command::parse("  QUOTE no 1.5 ").unwrap(),
            Some(Command::Quote {
                outcome: Outcome::No,
                quantity: 1.5
            })
        );
    }

    #[test]
    fn test_parse_open_defaults_price() {
        assert_eq!(
            Command::parse("open 25").unwrap(),
            Some(Command::Open {
                liquidity: 25.0,
                price_yes: 0.5
            })
        );
        assert_eq!(
            Command::parse("open 10 0.7").unwrap(),
            Some(Command::Open {
                liquidity: 10.0,
                price_yes: 0.7
            })
        );
    }

    #[test]
    fn test_parse_simple_verbs() {
        assert_eq!(Command::parse("price").unwrap(), Some(Command::Price(None)));
        assert_eq!(
            Command::parse("price no").unwrap(),
            Some(Command::Price(Some(Outcome::No)))
        );
        assert_eq!(Command::parse("inventory").unwrap(), Some(Command::Inventory));
        assert_eq!(Command::parse("history").unwrap(), Some(Command::History));
        assert_eq!(Command::parse("summary").unwrap(), Some(Command::Summary));
        assert_eq!(Command::parse("help").unwrap(), Some(Command::Help));
        assert_eq!(Command::parse("exit").unwrap(), Some(Command::Quit));
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Command::parse("sell yes 1").unwrap_err(),
            ConsoleError::UnknownCommand("sell".to_string())
        );
        assert!(matches!(
            Command::parse("buy maybe 1").unwrap_err(),
            ConsoleError::Outcome(MarketError::InvalidOutcome(_))
        ));
        assert!(matches!(
            Command::parse("buy yes").unwrap_err(),
            ConsoleError::MissingArgument { command: "buy", .. }
        ));
        assert_eq!(
            Command::parse("open ten").unwrap_err(),
            ConsoleError::InvalidNumber("ten".to_string())
        );
    }

    #[test]
    fn test_format_trade() {
        let mut session = MarketSession::open(10.0, 0.5).unwrap();
        let record = session.execute_trade(Outcome::Yes, 2.0).unwrap();
        let text = format_trade(record);
        assert!(text.contains("trade #1: bought 2 YES"));
        assert!(text.contains("cost: 1.05"));
        assert!(text.contains("new YES price: 0.5498"));
        assert!(text.contains("YES: 2 | NO: 0"));
    }

    #[test]
    fn test_format_open() {
        let session = MarketSession::open(10.0, 0.7).unwrap();
        let text = format_open(&session);
        let at = session.opened_at().format("%H:%M:%S").to_string();
        assert!(text.starts_with(&format!("market open (b=10) at {at}")));
        assert!(text.contains("initial YES price: 0.7000"));
        assert!(text.contains("YES: 8 | NO: 0"));
    }

    #[test]
    fn test_format_summary() {
        let mut session = MarketSession::open(10.0, 0.5).unwrap();
        session.execute_trade(Outcome::Yes, 2.0).unwrap();
        let summary = session.summary();
        let text = format_summary(&summary);
        let opened = summary.opened_at.format("%Y-%m-%d %H:%M:%S UTC").to_string();
        assert!(text.contains(&format!("opened: {opened}")));
        assert!(text.contains("trades: 1"));
        assert!(text.contains("collected: 1.05"));
        assert!(text.contains("C(q): 7.9814"));
    }

    #[test]
    fn test_parse_french_outcome_tags() {
        assert_eq!(
            Command::parse("buy OUI 3").unwrap(),
            Some(Command::Buy {
                outcome: Outcome::Yes,
                quantity: 3.0
            })
        );
    }

    #[test]
    fn test_format_history() {
        assert_eq!(format_history(&[0.5, 0.55]), "   0  0.5000\n   1  0.5500");
    }
}
