use std::fs;
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::error::AppError;

pub const SAMPLE_RATE: u32 = 24_000;
pub const CHANNELS: u16 = 1;
pub const BITS_PER_SAMPLE: u16 = 16;

fn spec() -> WavSpec {
    WavSpec {
        channels: CHANNELS,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    }
}

/// Write little-endian 16-bit PCM to a WAV file.
///
/// Samples go to a sibling `.part` file first and are renamed into place,
/// so `path` only ever names a complete file.
pub fn write_pcm16(path: &Path, pcm: &[u8]) -> Result<(), AppError> {
    let partial = partial_path(path);

    if let Err(e) = write_samples(&partial, pcm) {
        let _ = fs::remove_file(&partial);
        return Err(e);
    }

    fs::rename(&partial, path).map_err(|e| {
        let _ = fs::remove_file(&partial);
        AppError::IoError(e)
    })
}

fn write_samples(path: &Path, pcm: &[u8]) -> Result<(), AppError> {
    let mut writer = WavWriter::create(path, spec())?;
    // A trailing odd byte is not a whole sample.
    for chunk in pcm.chunks_exact(2) {
        writer.write_sample(i16::from_le_bytes([chunk[0], chunk[1]]))?;
    }
    writer.finalize()?;
    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_mono_24khz_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        let samples: [i16; 4] = [0, 1000, -1000, i16::MAX];
        let pcm: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();

        write_pcm16(&path, &pcm).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 24_000);
        assert_eq!(spec.bits_per_sample, 16);
        let read: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(read, samples);
        assert!(!dir.path().join("out.wav.part").exists());
    }

    #[test]
    fn empty_pcm_still_produces_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.wav");
        write_pcm16(&path, &[]).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"RIFF"));
        assert!(bytes.len() >= 44);
    }

    #[test]
    fn drops_trailing_odd_byte() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odd.wav");
        write_pcm16(&path, &[1, 0, 7]).unwrap();
        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.len(), 1);
    }

    #[test]
    fn missing_directory_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.wav");
        assert!(matches!(write_pcm16(&path, &[0, 0]), Err(AppError::WavError(_))));
        assert!(!path.exists());
    }
}
