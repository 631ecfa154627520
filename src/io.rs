//! Reading and writing box maps as JSON objects of the form
//! `{"image.jpg": [[x1, y1, x2, y2], ...], ...}`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::bbox::ImageBoxMap;
use crate::error::Error;

/// Drop boxes that are not finite or have no positive width and height.
///
/// Returns the number of removed boxes.
pub fn sanitize(map: &mut ImageBoxMap) -> usize {
    let mut dropped = 0;

    for (image, boxes) in map.iter_mut() {
        let before = boxes.len();
        boxes.retain(|b| b.is_valid());

        let n = before - boxes.len();
        if n > 0 {
            tracing::warn!(image = %image, dropped = n, "dropping degenerate boxes");
            dropped += n;
        }
    }

    dropped
}

/// Make sure every name in `images` is a key of `map`, inserting empty box
/// lists for the missing ones. Returns the number of inserted keys.
pub fn ensure_images<'a, I: IntoIterator<Item = &'a str>>(map: &mut ImageBoxMap, images: I) -> usize {
    let mut added = 0;

    for image in images {
        if !map.contains_key(image) {
            map.insert(image.to_string(), vec![]);
            added += 1;
        }
    }

    added
}

/// Parse and sanitize a box map.
pub fn read_box_map<R: Read>(reader: R) -> Result<ImageBoxMap, Error> {
    let mut map: ImageBoxMap = serde_json::from_reader(reader)?;
    sanitize(&mut map);

    Ok(map)
}

pub fn write_box_map<W: Write>(writer: W, map: &ImageBoxMap) -> Result<(), Error> {
    serde_json::to_writer(writer, map)?;

    Ok(())
}

pub fn load_box_map<P: AsRef<Path>>(path: P) -> Result<ImageBoxMap, Error> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| Error::io(path, err))?;

    let map = read_box_map(BufReader::new(file))?;
    tracing::info!(path = %path.display(), images = map.len(), "box map loaded");

    Ok(map)
}

pub fn save_box_map<P: AsRef<Path>>(path: P, map: &ImageBoxMap) -> Result<(), Error> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|err| Error::io(parent, err))?;
    }

    let file = File::create(path).map_err(|err| Error::io(path, err))?;
    let mut writer = BufWriter::new(file);
    write_box_map(&mut writer, map)?;
    writer.flush().map_err(|err| Error::io(path, err))?;

    tracing::info!(path = %path.display(), images = map.len(), "box map written");

    Ok(())
}
