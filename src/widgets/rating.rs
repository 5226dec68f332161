//! View state for the five-star rating control.

use crate::errors::{ErrorKind, Result};
use crate::widgets::host::{generate_block_uid, HostApi, TreeRef};

pub const STAR_COUNT: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarRating {
    rating: u8,
    hover: u8,
    /// Block whose text holds the persisted rating.
    value_uid: Option<String>,
    /// Block the rating button lives in; a value block is created under it
    /// on first click when none exists.
    button_uid: String,
}

impl StarRating {
    pub fn new(button_uid: &str, initial: u8, value_uid: Option<String>) -> StarRating {
        let initial = initial.min(STAR_COUNT);
        StarRating {
            rating: initial,
            hover: initial,
            value_uid,
            button_uid: button_uid.to_string(),
        }
    }

    /// Reads the initial value from the first child of the button's block
    /// whose text starts with an integer.
    pub fn mount(host: &dyn HostApi, button_uid: &str) -> Result<StarRating> {
        let tree = host
            .get_tree(TreeRef::Block(button_uid))?
            .ok_or_else(|| ErrorKind::NotFound(format!("block {} does not exist", button_uid)))?;

        let value = tree
            .children
            .iter()
            .find_map(|child| leading_integer(&child.text).map(|n| (n, child.uid.clone())));

        Ok(match value {
            Some((n, uid)) => StarRating::new(button_uid, n.max(0).min(i64::from(STAR_COUNT)) as u8, Some(uid)),
            None => StarRating::new(button_uid, 0, None),
        })
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn hover(&self) -> u8 {
        self.hover
    }

    pub fn enter(&mut self, index: u8) {
        self.hover = index.min(STAR_COUNT);
    }

    pub fn leave(&mut self) {
        self.hover = 0;
    }

    /// Sets the rating and writes it to the value block.
    pub fn click(&mut self, host: &dyn HostApi, index: u8) -> Result<()> {
        if index < 1 || index > STAR_COUNT {
            return Err(ErrorKind::Validation(format!("star {} is out of range", index)).into());
        }

        self.rating = index;
        let text = index.to_string();
        match &self.value_uid {
            Some(uid) => host.update_block(uid, &text)?,
            None => {
                let uid = generate_block_uid();
                host.create_block(&self.button_uid, 0, &uid, &text)?;
                self.value_uid = Some(uid);
            }
        }
        debug!(rating = index, "star rating saved");
        Ok(())
    }

    /// Stars are 1-based. A hover preview takes precedence over the saved
    /// rating.
    pub fn is_active(&self, star: u8) -> bool {
        if self.hover >= star {
            return true;
        }
        self.hover == 0 && self.rating >= star
    }

    pub fn active_stars(&self) -> Vec<bool> {
        (1..=STAR_COUNT).map(|star| self.is_active(star)).collect()
    }
}

/// Parses an optionally signed run of leading digits, ignoring leading
/// whitespace and anything after the digits. Values past the `i64` range
/// saturate.
pub fn leading_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits: Vec<i64> = rest
        .bytes()
        .take_while(u8::is_ascii_digit)
        .map(|b| i64::from(b - b'0'))
        .collect();
    if digits.is_empty() {
        return None;
    }
    let magnitude = digits
        .iter()
        .fold(0i64, |n, digit| n.saturating_mul(10).saturating_add(*digit));
    Some(if negative { -magnitude } else { magnitude })
}
