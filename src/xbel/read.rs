/* src/xbel/read.rs */

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::time::parse_stamp;
use super::{Application, Bookmark, BookmarkFile, METADATA_OWNER, XbelError};

fn parse_error(e: impl std::fmt::Display) -> XbelError {
	XbelError::Parse(e.to_string())
}

/// Element whose character data is being collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextSlot {
	Title,
	Description,
	Group,
}

#[derive(Default)]
struct Parser {
	file: Option<BookmarkFile>,
	current: Option<Bookmark>,
	in_metadata: bool,
	slot: Option<TextSlot>,
	text: String,
	/// Elements opened but not yet closed.
	depth: usize,
}

pub(super) fn parse(input: &[u8]) -> Result<BookmarkFile, XbelError> {
	let text = std::str::from_utf8(input).map_err(parse_error)?;
	let mut reader = Reader::from_str(text);
	reader.config_mut().trim_text(true);

	let mut parser = Parser::default();
	loop {
		match reader.read_event().map_err(parse_error)? {
			Event::Start(e) => {
				parser.open(&e)?;
				parser.depth += 1;
			}
			Event::Empty(e) => {
				parser.open(&e)?;
				parser.close(e.local_name().as_ref());
			}
			Event::End(e) => {
				parser.depth = parser.depth.saturating_sub(1);
				parser.close(e.local_name().as_ref());
			}
			Event::Text(t) => {
				if parser.slot.is_some() {
					parser.text.push_str(&t.unescape().map_err(parse_error)?);
				}
			}
			Event::CData(t) => {
				if parser.slot.is_some() {
					parser.text.push_str(&String::from_utf8_lossy(&t));
				}
			}
			Event::Eof => break,
			_ => {}
		}
	}

	match parser.file {
		None => Err(XbelError::MissingRoot),
		Some(_) if parser.depth > 0 => Err(XbelError::Parse(format!(
			"document ends with {} element(s) still open",
			parser.depth
		))),
		Some(file) => Ok(file),
	}
}

fn attribute(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, XbelError> {
	for attr in e.attributes() {
		let attr = attr.map_err(parse_error)?;
		if attr.key.local_name().as_ref() == name {
			return Ok(Some(attr.unescape_value().map_err(parse_error)?.into_owned()));
		}
	}
	Ok(None)
}

fn begin_text(slot: &mut Option<TextSlot>, text: &mut String, next: TextSlot) {
	*slot = Some(next);
	text.clear();
}

impl Parser {
	fn open(&mut self, e: &BytesStart<'_>) -> Result<(), XbelError> {
		let local = e.local_name();
		let name = local.as_ref();

		if self.file.is_none() {
			if name != b"xbel" {
				return Err(XbelError::UnexpectedRoot(String::from_utf8_lossy(name).into_owned()));
			}
			self.file = Some(BookmarkFile::new());
			return Ok(());
		}

		if name == b"bookmark" && self.current.is_none() {
			let href = attribute(e, b"href")?.ok_or(XbelError::MissingHref)?;
			let stamp = |attr: &[u8]| -> Result<u64, XbelError> {
				Ok(attribute(e, attr)?.as_deref().map_or(0, parse_stamp))
			};
			self.current = Some(Bookmark {
				added: stamp(b"added")?,
				modified: stamp(b"modified")?,
				visited: stamp(b"visited")?,
				..Bookmark::new(href)
			});
			return Ok(());
		}

		let Some(bookmark) = self.current.as_mut() else {
			return Ok(());
		};

		match name {
			b"title" => begin_text(&mut self.slot, &mut self.text, TextSlot::Title),
			b"desc" => begin_text(&mut self.slot, &mut self.text, TextSlot::Description),
			b"metadata" => {
				self.in_metadata = attribute(e, b"owner")?.as_deref() == Some(METADATA_OWNER);
			}
			b"mime-type" if self.in_metadata => {
				bookmark.mime_type = attribute(e, b"type")?;
			}
			b"group" if self.in_metadata => {
				begin_text(&mut self.slot, &mut self.text, TextSlot::Group);
			}
			b"private" if self.in_metadata => bookmark.private = true,
			b"application" if self.in_metadata => {
				let modified = match attribute(e, b"modified")? {
					Some(value) => parse_stamp(&value),
					// Older writers store a plain epoch in `timestamp`.
					None => attribute(e, b"timestamp")?
						.and_then(|value| value.trim().parse().ok())
						.unwrap_or(0),
				};
				bookmark.applications.push(Application {
					name: attribute(e, b"name")?.unwrap_or_default(),
					exec: attribute(e, b"exec")?.unwrap_or_default(),
					modified,
					count: attribute(e, b"count")?
						.and_then(|value| value.trim().parse().ok())
						.unwrap_or(1),
				});
			}
			_ => {}
		}
		Ok(())
	}

	fn close(&mut self, name: &[u8]) {
		match name {
			b"title" | b"desc" | b"group" => self.end_text(),
			b"metadata" => self.in_metadata = false,
			b"bookmark" => {
				if let (Some(file), Some(bookmark)) = (self.file.as_mut(), self.current.take()) {
					file.insert(bookmark);
				}
			}
			_ => {}
		}
	}

	fn end_text(&mut self) {
		let (Some(slot), Some(bookmark)) = (self.slot.take(), self.current.as_mut()) else {
			return;
		};
		let text = std::mem::take(&mut self.text);
		if text.is_empty() {
			return;
		}
		match slot {
			TextSlot::Title => bookmark.title = Some(text),
			TextSlot::Description => bookmark.description = Some(text),
			TextSlot::Group => bookmark.groups.push(text),
		}
	}
}
