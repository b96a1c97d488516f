#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use std::io::{Read, Seek, SeekFrom};
use tarfs_rs::{TarFs, VirtualFile};

#[derive(Arbitrary, Debug)]
enum Op {
    Read(u16),
    SeekStart(u64),
    SeekCurrent(i64),
    SeekEnd(i64),
    Readdir(i8),
    Stat,
}

#[derive(Arbitrary, Debug)]
struct Input {
    archive: Vec<u8>,
    path: String,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let fs = match TarFs::new(input.archive) {
        Ok(fs) => fs,
        Err(_) => return,
    };

    let mut handle = match fs.open(&input.path) {
        Ok(h) => h,
        Err(_) => return,
    };

    let size = handle.stat().size();
    for op in input.ops {
        match op {
            Op::Read(n) => {
                let mut buf = vec![0u8; n as usize];
                let _ = handle.read(&mut buf);
            }
            Op::SeekStart(pos) => {
                let _ = handle.seek(SeekFrom::Start(pos));
            }
            Op::SeekCurrent(delta) => {
                let _ = handle.seek(SeekFrom::Current(delta));
            }
            Op::SeekEnd(delta) => {
                let _ = handle.seek(SeekFrom::End(delta));
            }
            Op::Readdir(count) => {
                let _ = handle.readdir(count as isize);
            }
            Op::Stat => assert_eq!(handle.stat().size(), size),
        }
        let pos = handle.stream_position().unwrap();
        assert!(pos <= size);
    }
});
