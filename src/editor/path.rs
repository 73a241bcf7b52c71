//! Field paths such as `reviews[2].author` addressing a value inside a section payload.

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("empty field path")]
    Empty,

    #[error("malformed field path '{path}' at byte {at}")]
    Malformed { path: String, at: usize },

    #[error("'{0}' is not an object")]
    NotAnObject(String),

    #[error("'{0}' is not a list")]
    NotAList(String),

    #[error("index {index} out of bounds for '{path}' (len {len})")]
    OutOfBounds {
        path: String,
        index: usize,
        len: usize,
    },
}

pub fn parse_path(path: &str) -> Result<Vec<PathSegment>, PathError> {
    if path.trim().is_empty() {
        return Err(PathError::Empty);
    }

    let malformed = |at: usize| PathError::Malformed {
        path: path.to_string(),
        at,
    };

    let bytes = path.as_bytes();
    let mut segments = Vec::new();
    let mut i = 0;
    let mut expect_key = true;

    while i < bytes.len() {
        match bytes[i] {
            b'.' => {
                if expect_key {
                    return Err(malformed(i));
                }
                expect_key = true;
                i += 1;
            }
            b'[' => {
                if expect_key {
                    return Err(malformed(i));
                }
                let close = path[i..].find(']').map(|c| i + c).ok_or_else(|| malformed(i))?;
                let index = path[i + 1..close]
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| malformed(i + 1))?;
                segments.push(PathSegment::Index(index));
                expect_key = false;
                i = close + 1;
            }
            b']' => return Err(malformed(i)),
            _ => {
                if !expect_key {
                    return Err(malformed(i));
                }
                let end = path[i..]
                    .find(|c: char| c == '.' || c == '[' || c == ']')
                    .map(|e| i + e)
                    .unwrap_or(bytes.len());
                segments.push(PathSegment::Key(path[i..end].to_string()));
                expect_key = false;
                i = end;
            }
        }
    }

    if expect_key {
        return Err(malformed(bytes.len()));
    }
    Ok(segments)
}

fn describe(segments: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            PathSegment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            PathSegment::Index(index) => out.push_str(&format!("[{}]", index)),
        }
    }
    out
}

/// Sets the value at `segments`, creating missing object keys along the way.
/// List indices must already exist, except one past the end which appends.
pub fn set_at(root: &mut Value, segments: &[PathSegment], value: Value) -> Result<(), PathError> {
    let Some((last, parents)) = segments.split_last() else {
        return Err(PathError::Empty);
    };

    let mut current = root;
    for (depth, segment) in parents.iter().enumerate() {
        let here = describe(&segments[..=depth]);
        let next_is_index = matches!(segments[depth + 1], PathSegment::Index(_));
        current = match segment {
            PathSegment::Key(key) => {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| PathError::NotAnObject(describe(&segments[..depth])))?;
                obj.entry(key.clone()).or_insert_with(|| {
                    if next_is_index {
                        Value::Array(Vec::new())
                    } else {
                        Value::Object(Map::new())
                    }
                })
            }
            PathSegment::Index(index) => {
                let list = current
                    .as_array_mut()
                    .ok_or_else(|| PathError::NotAList(describe(&segments[..depth])))?;
                let len = list.len();
                list.get_mut(*index).ok_or(PathError::OutOfBounds {
                    path: here,
                    index: *index,
                    len,
                })?
            }
        };
    }

    let parent_path = describe(parents);
    match last {
        PathSegment::Key(key) => {
            let obj = current
                .as_object_mut()
                .ok_or(PathError::NotAnObject(parent_path))?;
            obj.insert(key.clone(), value);
        }
        PathSegment::Index(index) => {
            let list = current
                .as_array_mut()
                .ok_or_else(|| PathError::NotAList(parent_path.clone()))?;
            if *index < list.len() {
                list[*index] = value;
            } else if *index == list.len() {
                list.push(value);
            } else {
                return Err(PathError::OutOfBounds {
                    path: parent_path,
                    index: *index,
                    len: list.len(),
                });
            }
        }
    }
    Ok(())
}

pub fn get_at<'v>(root: &'v Value, segments: &[PathSegment]) -> Option<&'v Value> {
    segments.iter().try_fold(root, |current, segment| match segment {
        PathSegment::Key(key) => current.get(key.as_str()),
        PathSegment::Index(index) => current.get(*index),
    })
}
