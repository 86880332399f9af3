use std::io::Read;

/// Pull the audio payload out of a downloaded tar container.
///
/// The provider wraps the generated audio in a tar archive alongside
/// bookkeeping files; the first regular entry whose name carries the expected
/// extension is the payload. Returns `None` when no entry matches.
pub fn extract_audio(archive: &[u8], extension: &str) -> std::io::Result<Option<Vec<u8>>> {
    let mut archive = tar::Archive::new(archive);

    for entry in archive.entries()? {
        let mut entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let is_audio = entry
            .path()?
            .extension()
            .map(|ext| ext == extension)
            .unwrap_or(false);
        if is_audio {
            let mut audio = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut audio)?;
            return Ok(Some(audio));
        }
    }

    Ok(None)
}
