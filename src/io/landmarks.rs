// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! Named 3D landmark files
//!
//! One landmark per line, `name x y z`, separated by whitespace. Extra
//! columns after the coordinates are ignored.

use crate::error::{Error, Result};
use nalgebra::Point3;
use std::fs;
use std::path::Path;

/// Landmark positions in file order, addressable by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Landmarks {
    entries: Vec<(String, Point3<f64>)>,
}

impl Landmarks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite; an overwritten landmark keeps its position
    pub fn insert(&mut self, name: impl Into<String>, point: Point3<f64>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = point,
            None => self.entries.push((name, point)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Point3<f64>> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, p)| p)
    }

    /// Stored name and position of `name`
    pub fn entry(&self, name: &str) -> Option<(&str, &Point3<f64>)> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(n, p)| (n.as_str(), p))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Point3<f64>)> {
        self.entries.iter().map(|(n, p)| (n.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut landmarks = Self::new();

        for (line_idx, line) in text.lines().enumerate() {
            let line_no = line_idx + 1;
            let mut tokens = line.split_whitespace();
            let name = match tokens.next() {
                Some(name) => name,
                None => continue,
            };

            let mut coords = [0.0; 3];
            for coord in coords.iter_mut() {
                let token = tokens
                    .next()
                    .ok_or_else(|| Error::parse(line_no, format!("landmark '{}' needs 3 coordinates", name)))?;
                *coord = token
                    .parse()
                    .map_err(|_| Error::parse(line_no, format!("invalid coordinate '{}'", token)))?;
            }

            landmarks.insert(name, Point3::from(coords));
        }

        Ok(landmarks)
    }
}

impl FromIterator<(String, Point3<f64>)> for Landmarks {
    fn from_iter<I: IntoIterator<Item = (String, Point3<f64>)>>(iter: I) -> Self {
        let mut landmarks = Self::new();
        for (name, point) in iter {
            landmarks.insert(name, point);
        }
        landmarks
    }
}

/// Read a landmark file
pub fn read_landmarks(path: &Path) -> Result<Landmarks> {
    let text = fs::read_to_string(path)?;
    Landmarks::parse(&text)
}
