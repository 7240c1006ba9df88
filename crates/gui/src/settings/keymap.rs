use anyhow::{Context, Result, anyhow, bail, ensure};
use std::{path::PathBuf, str::FromStr};

use common::layout::{BoardLayout, MAX_COLUMNS, MAX_ROWS};
use keybinds::Keybinds;
use logos::Logos;
use strum::EnumString;
use tracing::error;

use crate::app::{AppMessage, OpenModal};

const DEFAULT_CONFIG: &str = include_str!("../../assets/default.conf");

#[derive(Debug, EnumString, Clone, Copy, PartialEq, Eq)]
pub enum BindableMessage {
    Restart,
    Quit,
    About,
    Cancel,
}

impl From<BindableMessage> for AppMessage {
    fn from(value: BindableMessage) -> Self {
        match value {
            BindableMessage::Restart => AppMessage::Modal(OpenModal::ConfirmRestart),
            BindableMessage::Quit => AppMessage::Quit,
            BindableMessage::About => AppMessage::Modal(OpenModal::About),
            BindableMessage::Cancel => AppMessage::CloseModal,
        }
    }
}

#[derive(Debug)]
pub struct Config {
    pub keyboard: Keybinds<BindableMessage>,
    shortcuts: Vec<(BindableMessage, String)>,
    pub board: BoardLayout,
    pub images: PathBuf,
}

impl Config {
    pub fn new() -> Self {
        Config {
            keyboard: Keybinds::new(vec![]),
            shortcuts: vec![],
            board: BoardLayout::default(),
            images: PathBuf::from("images"),
        }
    }

    /// Key sequence bound to `action` in the config, as written there.
    pub fn shortcut(&self, action: BindableMessage) -> Option<&str> {
        self.shortcuts
            .iter()
            .find(|(bound, _)| *bound == action)
            .map(|(_, keys)| keys.as_str())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_str(DEFAULT_CONFIG).unwrap_or_else(|e| {
            error!("Embedded default config is invalid: {:#}", e);
            Config::new()
        })
    }
}

impl FromStr for Config {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut sanitized = s.chars().filter(|&c| c != '\r').collect::<String>();
        if !sanitized.ends_with('\n') {
            sanitized.push('\n');
        }
        let lexer = Token::lexer(&sanitized);

        let mut expecting_statement = true;

        let mut cmd_name: Option<String> = None;
        let mut args = vec![];
        let mut line = 1;

        let mut out = Config::new();

        for token in lexer {
            match token {
                Ok(Token::String(s)) => {
                    if expecting_statement {
                        cmd_name = Some(s);
                    } else {
                        args.push(s);
                    }
                }
                Ok(Token::StatementDelim) => {
                    if let Some(name) = cmd_name.take() {
                        let cmd = Command::from_str(&name)
                            .map_err(|_| anyhow!("line {line}: unknown command {name:?}"))?;
                        out.apply(cmd, &args)
                            .with_context(|| format!("line {line}: {name}"))?;
                    }
                    expecting_statement = true;
                    args.clear();
                    line += 1;
                }
                Ok(Token::ArgDelim) => {
                    expecting_statement = cmd_name.is_none();
                }
                Err(()) => bail!("line {line}: unreadable input"),
            }
        }
        Ok(out)
    }
}

impl Config {
    fn apply(&mut self, cmd: Command, args: &[String]) -> Result<()> {
        match cmd {
            Command::Bind => {
                ensure!(args.len() == 2, "Bind requires 2 arguments");
                let action = BindableMessage::from_str(&args[1])
                    .map_err(|_| anyhow!("unknown action {:?}", args[1]))?;
                self.keyboard
                    .bind(&args[0], action)
                    .map_err(|e| anyhow!("invalid key sequence {:?}: {}", args[0], e))?;
                self.shortcuts.push((action, args[0].clone()));
            }
            Command::Board => {
                ensure!(args.len() == 3, "Board requires 3 arguments");
                let board = BoardLayout {
                    rows: args[0].parse()?,
                    left_columns: args[1].parse()?,
                    right_columns: args[2].parse()?,
                    ..self.board
                };
                ensure!(
                    board.within_limits(),
                    "Board allows at most {MAX_ROWS} rows and {MAX_COLUMNS} columns per band"
                );
                self.board = board;
            }
            Command::Images => {
                ensure!(args.len() == 1, "Images requires 1 argument");
                self.images = PathBuf::from(&args[0]);
            }
        }
        Ok(())
    }
}

/// Represents valid tokens in a configuration file.
#[derive(Debug, Logos)]
enum Token {
    #[regex(" +")]
    ArgDelim,

    #[token("\n")]
    StatementDelim,

    #[regex("[^ \n]+", |lex| lex.slice().to_owned())]
    String(String),
}

#[derive(Debug, EnumString)]
enum Command {
    Bind,
    Board,
    Images,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_default_parses() {
        let config = Config::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.board, BoardLayout::default());
        assert_eq!(config.images, PathBuf::from("images"));
    }

    #[test]
    fn board_and_images_override_defaults() {
        let config = Config::from_str("Board 10 3 2\r\n\nImages /srv/art").unwrap();
        assert_eq!(config.board.rows, 10);
        assert_eq!(config.board.left_columns, 3);
        assert_eq!(config.board.right_columns, 2);
        assert_eq!(config.board.right_name_limit, 35);
        assert_eq!(config.images, PathBuf::from("/srv/art"));
    }

    #[test]
    fn wrong_arity_is_an_error() {
        let err = Config::from_str("Board 10 3\n").unwrap_err();
        assert!(format!("{err:#}").contains("Board requires 3 arguments"));
    }

    #[test]
    fn shortcuts_are_remembered_for_menus() {
        let config = Config::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.shortcut(BindableMessage::Restart), Some("Ctrl+r"));
        assert_eq!(config.shortcut(BindableMessage::Quit), Some("Ctrl+q"));
        assert_eq!(Config::new().shortcut(BindableMessage::About), None);
    }

    #[test]
    fn oversized_board_is_rejected() {
        let err = Config::from_str("Board 99999999999999 4 4\n").unwrap_err();
        assert!(format!("{err:#}").contains("at most 64 rows"));
        assert!(Config::from_str("Board 18 4 17\n").is_err());
        assert!(Config::from_str("Board 64 16 16\n").is_ok());
    }

    #[test]
    fn unknown_command_is_an_error() {
        let err = Config::from_str("Images art\nSetServer Production\n").unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn unknown_action_is_an_error() {
        assert!(Config::from_str("Bind Ctrl+x Explode\n").is_err());
    }

    #[test]
    fn bindable_messages_map_to_app_messages() {
        assert!(matches!(
            AppMessage::from(BindableMessage::Restart),
            AppMessage::Modal(OpenModal::ConfirmRestart)
        ));
        assert!(matches!(
            AppMessage::from(BindableMessage::Cancel),
            AppMessage::CloseModal
        ));
    }
}
