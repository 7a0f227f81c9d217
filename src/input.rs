use crossterm::event::KeyCode;

use crate::model::shock::Shock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Shock(Shock),
    Quit,
}

pub fn parse_main_command(key_code: &KeyCode) -> Option<UiCommand> {
    match key_code {
        KeyCode::Esc => Some(UiCommand::Quit),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'b' => Some(UiCommand::Shock(Shock::Buy)),
            's' => Some(UiCommand::Shock(Shock::Sell)),
            'q' => Some(UiCommand::Quit),
            _ => None,
        },
        _ => None,
    }
}
