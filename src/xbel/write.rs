/* src/xbel/write.rs */

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::time::format_stamp;
use super::{BOOKMARK_NAMESPACE, Bookmark, BookmarkFile, METADATA_OWNER, MIME_NAMESPACE, XbelError};

struct DocumentWriter {
	inner: Writer<Vec<u8>>,
}

impl DocumentWriter {
	fn emit(&mut self, event: Event<'_>) -> Result<(), XbelError> {
		self.inner
			.write_event(event)
			.map_err(|e| XbelError::Write(e.to_string()))
	}

	fn open(&mut self, element: BytesStart<'_>) -> Result<(), XbelError> {
		self.emit(Event::Start(element))
	}

	fn close(&mut self, name: &str) -> Result<(), XbelError> {
		self.emit(Event::End(BytesEnd::new(name)))
	}

	fn text_element(&mut self, name: &str, text: &str) -> Result<(), XbelError> {
		self.open(BytesStart::new(name))?;
		self.emit(Event::Text(BytesText::new(text)))?;
		self.close(name)
	}
}

pub(super) fn serialize(file: &BookmarkFile) -> Result<Vec<u8>, XbelError> {
	let mut out = DocumentWriter {
		inner: Writer::new_with_indent(Vec::new(), b' ', 2),
	};

	out.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
	out.open(BytesStart::new("xbel").with_attributes([
		("version", "1.0"),
		("xmlns:bookmark", BOOKMARK_NAMESPACE),
		("xmlns:mime", MIME_NAMESPACE),
	]))?;
	for bookmark in file {
		write_bookmark(&mut out, bookmark)?;
	}
	out.close("xbel")?;

	let mut bytes = out.inner.into_inner();
	bytes.push(b'\n');
	Ok(bytes)
}

fn write_bookmark(out: &mut DocumentWriter, bookmark: &Bookmark) -> Result<(), XbelError> {
	let added = format_stamp(bookmark.added);
	let modified = format_stamp(bookmark.modified);
	let visited = format_stamp(bookmark.visited);
	out.open(BytesStart::new("bookmark").with_attributes([
		("href", bookmark.href.as_str()),
		("added", added.as_str()),
		("modified", modified.as_str()),
		("visited", visited.as_str()),
	]))?;

	if let Some(title) = &bookmark.title {
		out.text_element("title", title)?;
	}
	if let Some(description) = &bookmark.description {
		out.text_element("desc", description)?;
	}

	let has_metadata = bookmark.mime_type.is_some()
		|| !bookmark.groups.is_empty()
		|| !bookmark.applications.is_empty()
		|| bookmark.private;
	if has_metadata {
		out.open(BytesStart::new("info"))?;
		out.open(BytesStart::new("metadata").with_attributes([("owner", METADATA_OWNER)]))?;

		if let Some(mime_type) = &bookmark.mime_type {
			out.emit(Event::Empty(
				BytesStart::new("mime:mime-type").with_attributes([("type", mime_type.as_str())]),
			))?;
		}
		if !bookmark.groups.is_empty() {
			out.open(BytesStart::new("bookmark:groups"))?;
			for group in &bookmark.groups {
				out.text_element("bookmark:group", group)?;
			}
			out.close("bookmark:groups")?;
		}
		if !bookmark.applications.is_empty() {
			out.open(BytesStart::new("bookmark:applications"))?;
			for app in &bookmark.applications {
				let modified = format_stamp(app.modified);
				let count = app.count.to_string();
				out.emit(Event::Empty(BytesStart::new("bookmark:application").with_attributes([
					("name", app.name.as_str()),
					("exec", app.exec.as_str()),
					("modified", modified.as_str()),
					("count", count.as_str()),
				])))?;
			}
			out.close("bookmark:applications")?;
		}
		if bookmark.private {
			out.emit(Event::Empty(BytesStart::new("bookmark:private")))?;
		}

		out.close("metadata")?;
		out.close("info")?;
	}

	out.close("bookmark")
}

#[cfg(test)]
mod tests {
	use super::super::Application;
	use super::*;

	#[test]
	fn test_serialized_document_reads_back() {
		let mut report = Bookmark::new("file:///home/user/a%20b.pdf")
			.with_title("<draft> & notes")
			.with_mime_type("application/pdf")
			.with_times(1_714_555_920, 1_714_555_860);
		report.added = 1_714_555_800;
		report.groups.push("office".to_string());
		report.applications.push(Application {
			name: "Papers".to_string(),
			exec: "'papers %u'".to_string(),
			modified: 1_714_555_920,
			count: 2,
		});
		let bare = Bookmark::new("file:///tmp/x");
		let file: BookmarkFile = [report, bare].into_iter().collect();

		let bytes = serialize(&file).unwrap();
		let text = String::from_utf8(bytes.clone()).unwrap();
		assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
		assert!(text.contains("&lt;draft&gt; &amp; notes"));
		assert!(text.contains("<mime:mime-type type=\"application/pdf\"/>"));

		assert_eq!(BookmarkFile::from_slice(&bytes).unwrap(), file);
	}

	#[test]
	fn test_empty_document_is_loadable() {
		let bytes = serialize(&BookmarkFile::new()).unwrap();
		assert!(BookmarkFile::from_slice(&bytes).unwrap().is_empty());
	}
}
