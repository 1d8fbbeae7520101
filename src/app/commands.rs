use thiserror::Error;

use crate::export::ExportFormat;
use crate::input::{KeyChord, KeyChordError};

/// One line of console input, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Language(String),
    ToggleLanguage,
    Theme(String),
    ToggleTheme,
    Accent(String),
    SystemTheme { prefers_dark: bool },
    Export(ExportFormat),
    Key(KeyChord),
    Resize(u32),
    Visibility { hidden: bool },
    State,
    Stats,
    Save,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("`{command}` expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("invalid argument `{value}` for `{command}`")]
    InvalidArgument { command: &'static str, value: String },
    #[error(transparent)]
    Key(#[from] KeyChordError),
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Err(CommandError::Empty);
    };
    let argument = words.next();

    let command = match name.to_ascii_lowercase().as_str() {
        "lang" | "language" => Command::Language(required(argument, "lang", "a language code")?.to_string()),
        "toggle-lang" => Command::ToggleLanguage,
        "theme" => Command::Theme(required(argument, "theme", "light or dark")?.to_string()),
        "toggle-theme" => Command::ToggleTheme,
        "accent" => Command::Accent(required(argument, "accent", "a color theme name")?.to_string()),
        "system-theme" => {
            let value = required(argument, "system-theme", "light or dark")?;
            let prefers_dark = match value {
                "dark" => true,
                "light" => false,
                other => {
                    return Err(CommandError::InvalidArgument {
                        command: "system-theme",
                        value: other.to_string(),
                    })
                }
            };
            Command::SystemTheme { prefers_dark }
        }
        "export" => {
            let value = required(argument, "export", "pdf or png")?;
            match value.to_ascii_lowercase().as_str() {
                "pdf" => Command::Export(ExportFormat::Pdf),
                "png" => Command::Export(ExportFormat::Png),
                _ => {
                    return Err(CommandError::InvalidArgument {
                        command: "export",
                        value: value.to_string(),
                    })
                }
            }
        }
        "print" => Command::Export(ExportFormat::Print),
        "key" => Command::Key(KeyChord::parse(required(argument, "key", "a key chord")?)?),
        "resize" => {
            let value = required(argument, "resize", "a width in pixels")?;
            let width = value.parse().map_err(|_| CommandError::InvalidArgument {
                command: "resize",
                value: value.to_string(),
            })?;
            Command::Resize(width)
        }
        "hidden" => Command::Visibility { hidden: true },
        "visible" => Command::Visibility { hidden: false },
        "state" => Command::State,
        "stats" => Command::Stats,
        "save" => Command::Save,
        "quit" | "exit" => Command::Quit,
        _ => return Err(CommandError::Unknown(name.to_string())),
    };
    Ok(command)
}

fn required<'a>(
    argument: Option<&'a str>,
    command: &'static str,
    expected: &'static str,
) -> Result<&'a str, CommandError> {
    argument.ok_or(CommandError::MissingArgument { command, expected })
}

pub const COMMAND_HELP: &str = "\
commands:
  lang <en|ar>            switch language
  toggle-lang             switch to the other language
  theme <light|dark>      switch color mode
  toggle-theme            switch to the other color mode
  accent <name>           blue, green, purple, red, orange or teal
  system-theme <mode>     simulate an OS color scheme change
  export <pdf|png>        export the CV
  print                   print the CV
  key <chord>             press a shortcut, e.g. ctrl+shift+l
  resize <width>          resize the viewport
  hidden | visible        page visibility
  state | stats           show current state or export statistics
  save                    write the page
  quit";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ShortcutAction;

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(parse_command("lang ar"), Ok(Command::Language("ar".to_string())));
        assert_eq!(parse_command("  theme   dark "), Ok(Command::Theme("dark".to_string())));
        assert_eq!(parse_command("accent teal"), Ok(Command::Accent("teal".to_string())));
        assert_eq!(parse_command("export PNG"), Ok(Command::Export(ExportFormat::Png)));
        assert_eq!(parse_command("print"), Ok(Command::Export(ExportFormat::Print)));
        assert_eq!(parse_command("resize 640"), Ok(Command::Resize(640)));
        assert_eq!(
            parse_command("system-theme dark"),
            Ok(Command::SystemTheme { prefers_dark: true })
        );
        assert_eq!(parse_command("exit"), Ok(Command::Quit));
    }

    #[test]
    fn key_command_parses_the_chord() {
        let Ok(Command::Key(chord)) = parse_command("key ctrl+shift+l") else {
            panic!("expected a key command");
        };
        assert_eq!(chord.action(), Some(ShortcutAction::ToggleLanguage));
    }

    #[test]
    fn reports_bad_input() {
        assert_eq!(parse_command("   "), Err(CommandError::Empty));
        assert_eq!(parse_command("dance"), Err(CommandError::Unknown("dance".to_string())));
        assert!(matches!(
            parse_command("lang"),
            Err(CommandError::MissingArgument { command: "lang", .. })
        ));
        assert!(matches!(
            parse_command("export gif"),
            Err(CommandError::InvalidArgument { command: "export", .. })
        ));
        assert!(matches!(
            parse_command("resize wide"),
            Err(CommandError::InvalidArgument { command: "resize", .. })
        ));
        assert!(matches!(parse_command("key hyper+x"), Err(CommandError::Key(_))));
    }
}
