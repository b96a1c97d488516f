//! Shared helpers for building tar archives in tests

#![allow(dead_code)]

use tar::{Builder, EntryType, Header};

/// Archive of regular files using GNU headers
pub fn gnu_archive(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = Builder::new(Vec::new());
    for (path, data) in files {
        append_file(&mut builder, Header::new_gnu(), path, data);
    }
    builder.into_inner().unwrap()
}

/// Archive of regular files using POSIX ustar headers
pub fn ustar_archive(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = Builder::new(Vec::new());
    for (path, data) in files {
        append_file(&mut builder, Header::new_ustar(), path, data);
    }
    builder.into_inner().unwrap()
}

pub fn append_file(builder: &mut Builder<Vec<u8>>, mut header: Header, path: &str, data: &[u8]) {
    header.set_entry_type(EntryType::Regular);
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_mtime(1_600_000_000);
    header.set_cksum();
    builder.append_data(&mut header, path, data).unwrap();
}

pub fn append_dir(builder: &mut Builder<Vec<u8>>, path: &str) {
    let mut header = Header::new_gnu();
    header.set_entry_type(EntryType::Directory);
    header.set_size(0);
    header.set_mode(0o755);
    header.set_cksum();
    builder.append_data(&mut header, path, &[][..]).unwrap();
}

pub fn append_symlink(builder: &mut Builder<Vec<u8>>, path: &str, target: &str) {
    let mut header = Header::new_gnu();
    header.set_entry_type(EntryType::Symlink);
    header.set_size(0);
    header.set_mode(0o777);
    header.set_link_name(target).unwrap();
    header.set_cksum();
    builder.append_data(&mut header, path, std::io::empty()).unwrap();
}

/// GNU sparse entry storing `stored` as a single chunk at offset 0 of a file
/// whose expanded size is `real_size`
pub fn append_gnu_sparse(
    builder: &mut Builder<Vec<u8>>,
    path: &str,
    stored: &[u8],
    real_size: u64,
) {
    let mut header = Header::new_gnu();
    header.set_entry_type(EntryType::GNUSparse);
    header.set_size(stored.len() as u64);
    header.set_mode(0o644);

    // Old GNU layout: four 24-byte sparse slots at 386, realsize at 483.
    let raw = header.as_mut_bytes();
    write_octal(&mut raw[386..398], 0);
    write_octal(&mut raw[398..410], stored.len() as u64);
    write_octal(&mut raw[410..422], real_size);
    write_octal(&mut raw[422..434], 0);
    write_octal(&mut raw[483..495], real_size);

    header.set_cksum();
    builder.append_data(&mut header, path, stored).unwrap();
}

fn write_octal(field: &mut [u8], value: u64) {
    let text = format!("{:0width$o}\0", value, width = field.len() - 1);
    field.copy_from_slice(text.as_bytes());
}

/// Byte offset of the first header whose name field starts with `name`
pub fn header_offset(archive: &[u8], name: &str) -> usize {
    archive
        .chunks(512)
        .position(|block| block.starts_with(name.as_bytes()))
        .map(|idx| idx * 512)
        .expect("header not found")
}
