use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, MouseEvent};

pub enum Input {
    Key(KeyEvent),
    Mouse(MouseEvent),
}

pub fn poll_event(timeout: Duration) -> color_eyre::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

pub fn next_input(timeout: Duration) -> color_eyre::Result<Option<Input>> {
    loop {
        match poll_event(timeout)? {
            Some(Event::Key(key)) => return Ok(Some(Input::Key(key))),
            Some(Event::Mouse(mouse)) => return Ok(Some(Input::Mouse(mouse))),
            Some(_) => continue,
            None => return Ok(None),
        }
    }
}
