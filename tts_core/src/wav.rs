use std::io::Cursor;

pub const SAMPLE_RATE: u32 = 22_050;

/// Encode PCM f32 samples as a 16-bit mono WAV (RIFF) file in memory.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> anyhow::Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut out = Vec::with_capacity(44 + samples.len() * 2);
    {
        let mut writer = hound::WavWriter::new(Cursor::new(&mut out), spec)?;
        for &s in samples {
            // Convert f32 [-1.0,1.0] to i16
            let clamped = s.clamp(-1.0, 1.0);
            writer.write_sample((clamped * i16::MAX as f32) as i16)?;
        }
        writer.finalize()?;
    }
    Ok(out)
}

/// Silent clip of `seconds` length
pub fn silence(seconds: f32, sample_rate: u32) -> anyhow::Result<Vec<u8>> {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let n = (seconds * sample_rate as f32).round() as usize;
    encode_wav(&vec![0.0; n], sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_has_expected_length() {
        let bytes = silence(0.5, 8_000).unwrap();
        let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.spec().sample_rate, 8_000);
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.len(), 4_000);
    }

    #[test]
    fn test_samples_are_clamped() {
        let bytes = encode_wav(&[2.0, -2.0, 0.0], 8_000).unwrap();
        let mut reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![i16::MAX, -i16::MAX, 0]);
    }

    #[test]
    fn test_negative_duration_is_empty_clip() {
        let bytes = silence(-3.0, 8_000).unwrap();
        let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.len(), 0);
    }
}
