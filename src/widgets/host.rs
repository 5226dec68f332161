//! The slice of the note-taking application's block API the widgets use.

use std::collections::HashMap;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::errors::{ErrorKind, Result};

const UID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
const UID_LENGTH: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub uid: String,
    pub text: String,
    pub order: usize,
    pub children: Vec<TreeNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeRef<'a> {
    Block(&'a str),
    Page(&'a str),
}

pub trait HostApi: Send + Sync {
    fn create_block(&self, parent_uid: &str, order: usize, uid: &str, text: &str) -> Result<()>;
    fn update_block(&self, uid: &str, text: &str) -> Result<()>;
    fn move_block(&self, parent_uid: &str, order: usize, uid: &str) -> Result<()>;
    fn get_tree(&self, at: TreeRef) -> Result<Option<TreeNode>>;
}

/// Bytes of a v4 uuid holding the fixed version and variant bits.
const UUID_FIXED_BYTES: [usize; 2] = [6, 8];

/// A fresh nine character block uid.
pub fn generate_block_uid() -> String {
    Uuid::new_v4()
        .as_bytes()
        .iter()
        .enumerate()
        .filter(|(i, _)| !UUID_FIXED_BYTES.contains(i))
        .take(UID_LENGTH)
        .map(|(_, byte)| UID_ALPHABET[(*byte as usize) % UID_ALPHABET.len()] as char)
        .collect()
}

/// Looks up `key` among the top-level blocks of a settings tree and returns
/// the trimmed text of its first child, falling back to `default`.
pub fn setting_value(tree: &[TreeNode], key: &str, default: &str) -> String {
    tree.iter()
        .find(|node| node.text.trim().eq_ignore_ascii_case(key))
        .and_then(|node| node.children.first())
        .map(|value| value.text.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[derive(Debug, Clone)]
struct Block {
    text: String,
    parent: Option<String>,
    children: Vec<String>,
}

#[derive(Default)]
struct Graph {
    blocks: HashMap<String, Block>,
    pages: HashMap<String, String>,
}

impl Graph {
    fn node(&self, uid: &str, order: usize) -> Option<TreeNode> {
        let block = self.blocks.get(uid)?;
        Some(TreeNode {
            uid: uid.to_string(),
            text: block.text.clone(),
            order,
            children: block
                .children
                .iter()
                .enumerate()
                .filter_map(|(i, child)| self.node(child, i))
                .collect(),
        })
    }

    fn attach(&mut self, parent_uid: &str, order: usize, uid: &str) -> Result<()> {
        let parent = self.blocks.get_mut(parent_uid).ok_or_else(|| missing(parent_uid))?;
        let at = order.min(parent.children.len());
        parent.children.insert(at, uid.to_string());
        if let Some(block) = self.blocks.get_mut(uid) {
            block.parent = Some(parent_uid.to_string());
        }
        Ok(())
    }
}

fn missing(uid: &str) -> crate::errors::Error {
    ErrorKind::NotFound(format!("block {} does not exist", uid)).into()
}

/// An in-memory block graph.
#[derive(Default)]
pub struct MemoryHost {
    graph: Mutex<Graph>,
}

impl MemoryHost {
    pub fn add_page(&self, title: &str, uid: &str) {
        let mut graph = self.graph.lock();
        graph.pages.insert(title.to_string(), uid.to_string());
        graph.blocks.insert(
            uid.to_string(),
            Block {
                text: title.to_string(),
                parent: None,
                children: Vec::new(),
            },
        );
    }

    pub fn block_text(&self, uid: &str) -> Option<String> {
        self.graph.lock().blocks.get(uid).map(|block| block.text.clone())
    }

    pub fn parent_of(&self, uid: &str) -> Option<String> {
        self.graph.lock().blocks.get(uid).and_then(|block| block.parent.clone())
    }
}

impl HostApi for MemoryHost {
    fn create_block(&self, parent_uid: &str, order: usize, uid: &str, text: &str) -> Result<()> {
        let mut graph = self.graph.lock();
        if !graph.blocks.contains_key(parent_uid) {
            return Err(missing(parent_uid));
        }
        graph.blocks.insert(
            uid.to_string(),
            Block {
                text: text.to_string(),
                parent: None,
                children: Vec::new(),
            },
        );
        graph.attach(parent_uid, order, uid)
    }

    fn update_block(&self, uid: &str, text: &str) -> Result<()> {
        let mut graph = self.graph.lock();
        let block = graph.blocks.get_mut(uid).ok_or_else(|| missing(uid))?;
        block.text = text.to_string();
        Ok(())
    }

    fn move_block(&self, parent_uid: &str, order: usize, uid: &str) -> Result<()> {
        let mut graph = self.graph.lock();
        if !graph.blocks.contains_key(parent_uid) {
            return Err(missing(parent_uid));
        }
        let previous = graph.blocks.get(uid).ok_or_else(|| missing(uid))?.parent.clone();
        if let Some(previous) = previous {
            if let Some(old) = graph.blocks.get_mut(&previous) {
                old.children.retain(|child| child != uid);
            }
        }
        graph.attach(parent_uid, order, uid)
    }

    fn get_tree(&self, at: TreeRef) -> Result<Option<TreeNode>> {
        let graph = self.graph.lock();
        let uid = match at {
            TreeRef::Block(uid) => uid.to_string(),
            TreeRef::Page(title) => match graph.pages.get(title) {
                Some(uid) => uid.clone(),
                None => return Ok(None),
            },
        };
        Ok(graph.node(&uid, 0))
    }
}
