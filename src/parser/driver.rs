//! The dispatch loop: pulls quick-xml events and routes them through the
//! frame stack.

use quick_xml::events::Event;
use quick_xml::Reader;

use super::attrs::Attributes;
use super::frame::{ElementEnd, ElementStart, Frame, Parsed, Step};
use super::session::ParseSession;
use crate::core::{FormError, FormResult, LineIndex, MessageKey};

/// One open frame and the element depth it was opened at.
struct Open {
    frame: Frame,
    depth: usize,
}

/// Parses `text` whose root element must be `root_tag`; the root frame is
/// opened from the root start event by `open_root`.
pub fn drive<F>(session: &mut ParseSession<'_>, text: &str, root_tag: &str, open_root: F) -> FormResult<Parsed>
where
    F: FnOnce(&mut ParseSession<'_>, &ElementStart) -> FormResult<Frame>,
{
    let index = LineIndex::new(text);
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);
    reader.expand_empty_elements(true);
    reader.check_end_names(true);

    let mut state = DriverState {
        stack: Vec::new(),
        texts: Vec::new(),
        depth: 0,
        result: None,
        open_root: Some(open_root),
        root_tag,
    };
    let mut buf = Vec::new();

    loop {
        let offset = reader.buffer_position();
        let event = reader.read_event_into(&mut buf);
        let step = match event {
            Ok(Event::Start(e)) => Attributes::from_start(&e).and_then(|attrs| {
                let start = ElementStart {
                    tag: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                    attrs,
                };
                state.start(session, start)
            }),
            Ok(Event::End(e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                state.end(session, tag)
            }
            Ok(Event::Text(e)) => e.unescape().map_err(FormError::from).map(|t| state.push_text(&t)),
            Ok(Event::CData(e)) => {
                let data = e.into_inner();
                state.push_text(&String::from_utf8_lossy(&data));
                Ok(())
            }
            Ok(Event::Eof) => break,
            // декларация, комментарии, инструкции обработки
            Ok(_) => Ok(()),
            Err(e) => Err(FormError::from(e)),
        };
        if let Err(err) = step {
            return Err(err.at(session.source_name(), Some(index.to_position(offset))));
        }
        buf.clear();
    }

    let end = Some(index.to_position(text.len()));
    if !state.stack.is_empty() {
        return Err(FormError::malformed("unexpected end of definition").at(session.source_name(), end));
    }
    state
        .result
        .ok_or_else(|| FormError::malformed("definition has no root element").at(session.source_name(), end))
}

struct DriverState<'r, F> {
    stack: Vec<Open>,
    /// Character data per open element.
    texts: Vec<String>,
    depth: usize,
    result: Option<Parsed>,
    open_root: Option<F>,
    root_tag: &'r str,
}

impl<F> DriverState<'_, F>
where
    F: FnOnce(&mut ParseSession<'_>, &ElementStart) -> FormResult<Frame>,
{
    fn start(&mut self, session: &mut ParseSession<'_>, start: ElementStart) -> FormResult<()> {
        self.depth += 1;
        self.texts.push(String::new());

        let Some(top) = self.stack.last_mut() else {
            return self.open_root(session, start);
        };

        if let Step::Delegate(child) = top.frame.on_start(session, &start)? {
            self.stack.push(Open {
                frame: child,
                depth: self.depth,
            });
        }
        Ok(())
    }

    fn open_root(&mut self, session: &mut ParseSession<'_>, start: ElementStart) -> FormResult<()> {
        if self.result.is_some() {
            return Err(FormError::malformed(format!("content after the root element: <{}>", start.tag)));
        }
        if start.tag != self.root_tag {
            return Err(FormError::new(MessageKey::UnexpectedRootElement, [self.root_tag, start.tag.as_str()]));
        }
        let open = self
            .open_root
            .take()
            .ok_or_else(|| FormError::malformed("root element opened twice"))?;
        let frame = open(session, &start)?;
        self.stack.push(Open {
            frame,
            depth: self.depth,
        });
        Ok(())
    }

    fn end(&mut self, session: &mut ParseSession<'_>, tag: String) -> FormResult<()> {
        let text = self.texts.pop().unwrap_or_default();
        let depth = self.depth;
        self.depth = self.depth.saturating_sub(1);

        let closes_top = matches!(self.stack.last(), Some(open) if open.depth == depth);
        if !closes_top {
            return match self.stack.last_mut() {
                Some(top) => top.frame.on_end(session, &ElementEnd { tag, text }),
                None => Err(FormError::malformed(format!("unbalanced end tag </{}>", tag))),
            };
        }

        let Some(open) = self.stack.pop() else {
            return Ok(());
        };
        let parsed = open.frame.finish(session)?;
        match self.stack.last_mut() {
            Some(parent) => parent.frame.integrate(session, parsed),
            None => {
                self.result = Some(parsed);
                Ok(())
            }
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(buf) = self.texts.last_mut() {
            buf.push_str(text);
        }
    }
}
