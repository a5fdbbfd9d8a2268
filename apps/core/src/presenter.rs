use std::io::Write;

use crate::contract::{ActionFailedDto, ClosedDto, RenderFrame, SessionEvent};

/// Receives frames and session events. Drawing, theming and icons are up to
/// the implementation.
pub trait Presenter {
    fn render(&mut self, frame: &RenderFrame) -> std::io::Result<()>;
    fn closed(&mut self, input_text: &str, return_focus: bool) -> std::io::Result<()>;
    fn action_failed(&mut self, message: &str) -> std::io::Result<()>;
}

/// Plain text: the input line, then one line per result showing only the
/// suffix after the shared base, with `>` marking the selection.
pub struct TextPresenter<W: Write> {
    out: W,
}

impl<W: Write> TextPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn render(&mut self, frame: &RenderFrame) -> std::io::Result<()> {
        let marker = if frame.fuzzy { "~" } else { ">" };
        writeln!(self.out, "{marker} {}", frame.input_text)?;
        for (index, result) in frame.results.iter().enumerate() {
            let cursor = if index == frame.selected_index { '>' } else { ' ' };
            writeln!(self.out, "  {cursor} {}", frame.result_suffix(result))?;
        }
        self.out.flush()
    }

    fn closed(&mut self, input_text: &str, _return_focus: bool) -> std::io::Result<()> {
        writeln!(self.out, "{input_text}")?;
        self.out.flush()
    }

    fn action_failed(&mut self, message: &str) -> std::io::Result<()> {
        writeln!(self.out, "! {message}")?;
        self.out.flush()
    }
}

/// One JSON `SessionEvent` per line.
pub struct JsonPresenter<W: Write> {
    out: W,
}

impl<W: Write> JsonPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, event: &SessionEvent) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl<W: Write> Presenter for JsonPresenter<W> {
    fn render(&mut self, frame: &RenderFrame) -> std::io::Result<()> {
        self.emit(&SessionEvent::Frame(frame.clone()))
    }

    fn closed(&mut self, input_text: &str, return_focus: bool) -> std::io::Result<()> {
        self.emit(&SessionEvent::Closed(ClosedDto {
            input_text: input_text.to_string(),
            return_focus,
        }))
    }

    fn action_failed(&mut self, message: &str) -> std::io::Result<()> {
        self.emit(&SessionEvent::ActionFailed(ActionFailedDto {
            message: message.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::{JsonPresenter, Presenter, TextPresenter};
    use crate::contract::{RenderFrame, SessionEvent};

    fn frame() -> RenderFrame {
        RenderFrame {
            input_text: "/home/user/".to_string(),
            base_length: "/home/user/".len(),
            results: vec![
                "/home/user/Documents/".to_string(),
                "/home/user/doc.txt".to_string(),
            ],
            selected_index: 0,
            fuzzy: false,
        }
    }

    #[test]
    fn text_presenter_shows_suffixes_and_selection() {
        let mut presenter = TextPresenter::new(Vec::new());
        presenter.render(&frame()).unwrap();
        presenter.closed("/home/user/doc.txt", false).unwrap();
        let text = String::from_utf8(presenter.into_inner()).unwrap();
        assert_eq!(
            text,
            "> /home/user/\n  > Documents/\n    doc.txt\n/home/user/doc.txt\n"
        );
    }

    #[test]
    fn json_presenter_writes_one_event_per_line() {
        let mut presenter = JsonPresenter::new(Vec::new());
        presenter.render(&frame()).unwrap();
        presenter.action_failed("boom").unwrap();
        let text = String::from_utf8(presenter.into_inner()).unwrap();
        let events: Vec<SessionEvent> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], SessionEvent::Frame(_)));
        assert!(matches!(events[1], SessionEvent::ActionFailed(_)));
    }
}
