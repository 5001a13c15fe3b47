use std::collections::VecDeque;

use embedded_io_async::{ErrorKind, ErrorType, Read, Write};

use crate::checksum::sum8;
use crate::constants::{DATA_REPORT_ID, HEAD, REPLY_ID, TAIL};

pub fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::max())
        .is_test(true)
        .try_init();
}

/// Data report from sensor `A1 60` carrying raw tenths of µg/m³.
pub fn data_frame(pm2_5: u16, pm10: u16) -> [u8; 10] {
    let [a, b] = pm2_5.to_le_bytes();
    let [c, d] = pm10.to_le_bytes();
    frame(DATA_REPORT_ID, [a, b, c, d, 0xA1, 0x60])
}

pub fn reply_frame(data: [u8; 6]) -> [u8; 10] {
    frame(REPLY_ID, data)
}

fn frame(kind: u8, data: [u8; 6]) -> [u8; 10] {
    let mut frame = [HEAD, kind, 0, 0, 0, 0, 0, 0, 0, TAIL];
    frame[2..8].copy_from_slice(&data);
    frame[8] = sum8(&data);
    frame
}

/// In-memory port: reads drain `rx` a few bytes at a time, writes land in `tx`.
///
/// An empty `rx` reads as end-of-file.
#[derive(Default)]
pub struct MockPort {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
    read_error: Option<ErrorKind>,
    write_error: Option<ErrorKind>,
}

impl MockPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    pub fn remaining(&self) -> usize {
        self.rx.len()
    }

    pub fn fail_reads(&mut self, kind: ErrorKind) {
        self.read_error = Some(kind);
    }

    pub fn fail_writes(&mut self, kind: ErrorKind) {
        self.write_error = Some(kind);
    }
}

impl ErrorType for MockPort {
    type Error = ErrorKind;
}

impl Read for MockPort {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if let Some(kind) = self.read_error {
            return Err(kind);
        }
        let n = buf.len().min(self.rx.len()).min(4);
        for byte in buf.iter_mut().take(n) {
            *byte = self.rx.pop_front().unwrap_or_default();
        }
        Ok(n)
    }
}

impl Write for MockPort {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if let Some(kind) = self.write_error {
            return Err(kind);
        }
        self.tx.extend_from_slice(buf);
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        match self.write_error {
            Some(kind) => Err(kind),
            None => Ok(()),
        }
    }
}
