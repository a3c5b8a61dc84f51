//! `/library/sections` XML parsing and section path matching.

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::types::Section;

/// Parse a `MediaContainer` body into its `Directory` entries.
///
/// Every `Directory` element is returned regardless of depth, and each one
/// collects the `path` of every `Location` nested anywhere inside it.
pub fn parse_sections(xml: &str) -> Result<Vec<Section>, quick_xml::Error> {
  let mut reader = Reader::from_str(xml);
  reader.config_mut().trim_text(true);

  let mut sections: Vec<Section> = Vec::new();
  // Indices of the Directory elements currently open.
  let mut open: Vec<usize> = Vec::new();

  loop {
    match reader.read_event()? {
      Event::Start(e) => match e.name().as_ref() {
        b"Directory" => {
          sections.push(directory(&e)?);
          open.push(sections.len() - 1);
        }
        b"Location" => add_location(&e, &open, &mut sections)?,
        _ => {}
      },
      Event::Empty(e) => match e.name().as_ref() {
        b"Directory" => sections.push(directory(&e)?),
        b"Location" => add_location(&e, &open, &mut sections)?,
        _ => {}
      },
      Event::End(e) => {
        if e.name().as_ref() == b"Directory" {
          open.pop();
        }
      }
      Event::Eof => break,
      _ => {}
    }
  }

  Ok(sections)
}

fn directory(e: &BytesStart<'_>) -> Result<Section, quick_xml::Error> {
  Ok(Section {
    kind: attribute(e, "type")?,
    key: attribute(e, "key")?,
    locations: Vec::new(),
  })
}

fn add_location(
  e: &BytesStart<'_>,
  open: &[usize],
  sections: &mut [Section],
) -> Result<(), quick_xml::Error> {
  if let Some(path) = attribute(e, "path")? {
    for &idx in open {
      sections[idx].locations.push(path.clone());
    }
  }
  Ok(())
}

fn attribute(e: &BytesStart<'_>, name: &str) -> Result<Option<String>, quick_xml::Error> {
  match e.try_get_attribute(name).map_err(quick_xml::Error::from)? {
    Some(attr) => {
      let raw = String::from_utf8_lossy(&attr.value);
      let value = unescape(&raw).map_err(quick_xml::Error::from)?;
      Ok(Some(value.into_owned()))
    }
    None => Ok(None),
  }
}

/// Normalize a path so Windows and POSIX spellings compare equal.
///
/// Lower-cases, collapses runs of `/` and `\` into one `/`, then drops a
/// leading prefix of up to two characters that ends in a separator
/// (`c:/`, `/`, `./`). The longest such prefix wins.
pub fn normalize_path(path: &str) -> String {
  let lowered = path.to_lowercase();
  let mut collapsed = String::with_capacity(lowered.len());
  let mut last_sep = false;
  for c in lowered.chars() {
    if c == '/' || c == '\\' {
      if !last_sep {
        collapsed.push('/');
      }
      last_sep = true;
    } else {
      collapsed.push(c);
      last_sep = false;
    }
  }

  let head: Vec<(usize, char)> = collapsed.char_indices().take(3).collect();
  for n in (0..=2).rev() {
    if let Some(&(idx, '/')) = head.get(n) {
      if head[..n].iter().all(|&(_, c)| c != '\n') {
        return collapsed[idx + 1..].to_string();
      }
    }
  }
  collapsed
}

/// Whether a section rooted at `section_path` covers `file_location`.
pub fn section_matches(section_path: &str, file_location: &str) -> bool {
  normalize_path(file_location).contains(&normalize_path(section_path))
}
