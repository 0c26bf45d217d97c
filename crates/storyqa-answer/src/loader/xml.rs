use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::path::Path;
use tracing::debug;

use storyqa_core::traits::StoryLoader;
use storyqa_core::{Error, Result, Unit};

use super::read_story_text;

const MESSAGE_NAMES: [&str; 3] = ["message", "msg", "messageentry"];
const SEEN_NAMES_LIMIT: usize = 30;

/// Loads `<message>` elements, or `<event>` children of `<events>` when a
/// story has no messages. Each unit keeps its element's source text verbatim.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlStoryLoader;

impl StoryLoader for XmlStoryLoader {
    fn load(&self, path: &Path) -> Result<Vec<Unit>> {
        let content = read_story_text(path)?;
        parse_story_xml(&content).map_err(|e| match e {
            Error::StoryParse(msg) => Error::StoryParse(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }
}

/// Element with namespace prefix stripped and byte span into the source.
#[derive(Debug, Default)]
struct Node {
    name: String,
    attrs: Vec<(String, String)>,
    text: String,
    children: Vec<Node>,
    start: usize,
    end: usize,
}

impl Node {
    fn open(e: &BytesStart<'_>, start: usize) -> Result<Self> {
        let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
        let mut attrs = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| parse_error(format!("bad attribute on <{}>: {}", name, err)))?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value().map_err(|err| parse_error(err.to_string()))?.into_owned();
            attrs.push((key, value));
        }
        Ok(Self { name, attrs, start, ..Self::default() })
    }

    fn is(&self, name: &str) -> bool { self.name.eq_ignore_ascii_case(name) }

    fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    fn child(&self, names: &[&str]) -> Option<&Node> {
        self.children.iter().find(|c| names.iter().any(|n| c.is(n)))
    }

    fn descendants(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        for child in &self.children {
            out.push(child);
            out.extend(child.descendants());
        }
        out
    }
}

fn parse_error(msg: impl Into<String>) -> Error { Error::StoryParse(msg.into()) }

fn attach(node: Node, stack: &mut [Node], root: &mut Option<Node>) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_none() => *root = Some(node),
        None => return Err(parse_error("multiple root elements")),
    }
    Ok(())
}

fn parse_tree(content: &str) -> Result<Node> {
    let mut reader = Reader::from_str(content);
    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        let start = reader.buffer_position();
        match reader.read_event() {
            Ok(Event::Start(e)) => stack.push(Node::open(&e, start)?),
            Ok(Event::Empty(e)) => {
                let mut node = Node::open(&e, start)?;
                node.end = reader.buffer_position();
                attach(node, &mut stack, &mut root)?;
            }
            Ok(Event::End(_)) => {
                let mut node = stack.pop().ok_or_else(|| parse_error("unbalanced end tag"))?;
                node.end = reader.buffer_position();
                attach(node, &mut stack, &mut root)?;
            }
            Ok(Event::Text(t)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&t.unescape().map_err(|e| parse_error(e.to_string()))?);
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(parse_error(format!("{} at byte {}", e, reader.buffer_position()))),
        }
    }
    if let Some(open) = stack.last() {
        return Err(parse_error(format!("unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| parse_error("document has no root element"))
}

/// Either the `ref` attribute or the element's own text.
fn participant(node: Option<&Node>, allow_text: bool) -> String {
    match node {
        Some(n) => match n.attr("ref") {
            Some(r) if !r.is_empty() => r.to_string(),
            _ if allow_text => n.text.trim().to_string(),
            _ => String::new(),
        },
        None => String::new(),
    }
}

fn body_text(node: Option<&Node>) -> String {
    node.map(|n| n.text.clone()).unwrap_or_default()
}

pub fn parse_story_xml(content: &str) -> Result<Vec<Unit>> {
    let root = parse_tree(content)?;
    let raw = |n: &Node| Some(content[n.start..n.end].to_string());

    let messages: Vec<Unit> = root
        .descendants()
        .into_iter()
        .filter(|n| MESSAGE_NAMES.iter().any(|m| n.is(m)))
        .map(|n| Unit {
            id: n.attr("id").unwrap_or_default().to_string(),
            sender: participant(n.child(&["sender"]), false),
            receiver: participant(n.child(&["receiver"]), false),
            body: body_text(n.child(&["body"])),
            raw: raw(n),
        })
        .collect();
    if !messages.is_empty() {
        debug!(units = messages.len(), "loaded story messages");
        return Ok(messages);
    }

    let all = std::iter::once(&root).chain(root.descendants());
    let events: Vec<Unit> = all
        .filter(|n| n.is("events"))
        .flat_map(|events| events.children.iter().filter(|c| c.is("event")))
        .enumerate()
        .map(|(idx, n)| Unit {
            id: n.attr("id").map(str::to_string).unwrap_or_else(|| (idx + 1).to_string()),
            sender: participant(n.child(&["sender", "from"]), true),
            receiver: participant(n.child(&["receiver", "to"]), true),
            body: body_text(n.child(&["body", "text", "description", "content"])),
            raw: raw(n),
        })
        .collect();
    if !events.is_empty() {
        debug!(units = events.len(), "loaded story events");
        return Ok(events);
    }

    let mut seen: Vec<&str> = Vec::new();
    for n in std::iter::once(&root).chain(root.descendants()) {
        if !seen.iter().any(|s| s.eq_ignore_ascii_case(&n.name)) { seen.push(&n.name); }
        if seen.len() >= SEEN_NAMES_LIMIT { break; }
    }
    Err(parse_error(format!("No messages found in story XML (root={}, seen_localnames=[{}])", root.name, seen.join(", "))))
}
