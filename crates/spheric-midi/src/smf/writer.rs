//! SMF file writer - assembles the header and tracks into a complete file.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::Builder;

use super::header::{SmfHeader, SMF_MAX_TICKS_PER_BEAT};
use super::track::Track;
use crate::error::EncodeError;

/// A complete composition: one time base and an ordered list of tracks.
///
/// Track 0 is the control track and is reserved for global meta events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    ticks_per_beat: u16,
    tracks: Vec<Track>,
    running_status: bool,
}

impl Sequence {
    /// Create an empty sequence holding only the control track.
    pub fn new(ticks_per_beat: u16) -> Result<Self, EncodeError> {
        if ticks_per_beat == 0 {
            return Err(EncodeError::InvalidConfiguration(
                "ticks per beat must be positive".to_string(),
            ));
        }
        if ticks_per_beat > SMF_MAX_TICKS_PER_BEAT {
            return Err(EncodeError::InvalidConfiguration(format!(
                "ticks per beat must be at most {}, got {}",
                SMF_MAX_TICKS_PER_BEAT, ticks_per_beat
            )));
        }
        Ok(Self {
            ticks_per_beat,
            tracks: vec![Track::new()],
            running_status: true,
        })
    }

    /// Enable or disable running status when encoding channel events.
    pub fn with_running_status(mut self, enabled: bool) -> Self {
        self.running_status = enabled;
        self
    }

    /// Time resolution shared by all tracks.
    pub fn ticks_per_beat(&self) -> u16 {
        self.ticks_per_beat
    }

    /// Whether running status is used when encoding.
    pub fn running_status(&self) -> bool {
        self.running_status
    }

    /// All tracks in output order, control track first.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Number of tracks including the control track.
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// The control track (always track 0).
    pub fn control_track_mut(&mut self) -> &mut Track {
        &mut self.tracks[0]
    }

    /// Append a new empty track and return it. Append order is output order.
    pub fn add_track(&mut self) -> &mut Track {
        self.tracks.push(Track::new());
        let last = self.tracks.len() - 1;
        &mut self.tracks[last]
    }

    /// Write the complete SMF file to a writer.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        let num_tracks = u16::try_from(self.tracks.len()).map_err(|_| {
            EncodeError::InvalidConfiguration(format!(
                "too many tracks: {} (at most {})",
                self.tracks.len(),
                u16::MAX
            ))
        })?;

        SmfHeader::new(num_tracks, self.ticks_per_beat).write(writer)?;

        for track in &self.tracks {
            track.write(writer, self.running_status)?;
        }

        Ok(())
    }

    /// Write the sequence to a byte vector.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let mut buffer = Vec::new();
        self.write(&mut buffer)?;
        Ok(buffer)
    }

    /// Compute the BLAKE3 hash of the sequence bytes.
    pub fn compute_hash(&self) -> Result<String, EncodeError> {
        let bytes = self.to_bytes()?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }

    /// Serialize and write the sequence to `path`.
    ///
    /// The bytes go to a temporary file in the destination directory that is
    /// renamed over `path` only after a successful write, so `path` never holds
    /// a partial file. On failure the temporary file is removed.
    pub fn write_to_file(&self, path: &Path) -> Result<(), EncodeError> {
        let bytes = self.to_bytes()?;
        write_atomic(path, &bytes)?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote MIDI file");
        Ok(())
    }
}

/// Write `bytes` to `path` through a sibling temp file and a rename.
///
/// The result has the permissions a plain `fs::write` would give it: the
/// existing file's mode when replacing, otherwise `0o666` minus the umask.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = temp_file_builder().tempfile_in(dir)?;
    file.write_all(bytes)?;
    if let Ok(existing) = fs::metadata(path) {
        file.as_file().set_permissions(existing.permissions())?;
    }
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// tempfile defaults to 0o600; the mode passed here is still masked by the umask.
#[cfg(unix)]
fn temp_file_builder() -> Builder<'static, 'static> {
    use std::os::unix::fs::PermissionsExt;

    let mut builder = Builder::new();
    builder.permissions(fs::Permissions::from_mode(0o666));
    builder
}

#[cfg(not(unix))]
fn temp_file_builder() -> Builder<'static, 'static> {
    Builder::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smf::Event;

    #[test]
    fn test_sequence_creation() {
        let sequence = Sequence::new(480).unwrap();
        assert_eq!(sequence.ticks_per_beat(), 480);
        assert_eq!(sequence.track_count(), 1);
        assert!(sequence.tracks()[0].is_empty());
    }

    #[test]
    fn test_zero_ticks_per_beat_rejected() {
        assert!(matches!(
            Sequence::new(0),
            Err(EncodeError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Sequence::new(0x8000),
            Err(EncodeError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_tracks_keep_append_order() {
        let mut sequence = Sequence::new(480).unwrap();
        sequence.add_track().set_instrument(90).unwrap();
        sequence.add_track().set_instrument(73).unwrap();
        sequence.add_track().set_instrument(46).unwrap();

        let programs: Vec<u8> = sequence.tracks()[1..]
            .iter()
            .map(|t| match t.events()[0].event {
                Event::ProgramChange { program, .. } => program,
                other => panic!("expected ProgramChange, got {:?}", other),
            })
            .collect();
        assert_eq!(programs, vec![90, 73, 46]);
    }

    #[test]
    fn test_control_track_only_file() {
        let mut sequence = Sequence::new(96).unwrap();
        sequence.control_track_mut().add_tempo(500_000).unwrap();
        let bytes = sequence.to_bytes().unwrap();

        assert_eq!(&bytes[0..4], b"MThd");
        // format 0, one track, 96 ticks
        assert_eq!(&bytes[8..14], &[0, 0, 0, 1, 0, 96]);
        assert_eq!(&bytes[14..18], b"MTrk");
        assert_eq!(&bytes[bytes.len() - 3..], &[0xFF, 0x2F, 0x00]);
    }

    #[test]
    fn test_running_status_shrinks_output() {
        let mut sequence = Sequence::new(480).unwrap();
        sequence.add_track().emit_chord(&[60, 64, 67], 64, 480).unwrap();
        let compact = sequence.to_bytes().unwrap();
        let verbose = sequence.clone().with_running_status(false).to_bytes().unwrap();
        // 4 status bytes saved: two NoteOns and two NoteOffs follow the same status.
        assert_eq!(verbose.len() - compact.len(), 4);
    }

    #[test]
    fn test_hash_determinism() {
        let build = || {
            let mut sequence = Sequence::new(480).unwrap();
            sequence.control_track_mut().add_tempo(666_667).unwrap();
            sequence.add_track().emit_note(60, 100, 480).unwrap();
            sequence
        };
        assert_eq!(
            build().compute_hash().unwrap(),
            build().compute_hash().unwrap()
        );
    }

    #[test]
    fn test_write_to_file_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mid");
        std::fs::write(&path, b"stale").unwrap();

        let sequence = Sequence::new(480).unwrap();
        sequence.write_to_file(&path).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), sequence.to_bytes().unwrap());
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_write_to_missing_directory_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.mid");

        let err = Sequence::new(480).unwrap().write_to_file(&path).unwrap_err();
        assert!(matches!(err, EncodeError::Io(_)));
        assert!(!path.exists());
    }

    #[cfg(unix)]
    fn mode(path: &Path) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_mode_matches_plain_write() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain.mid");
        std::fs::write(&plain, b"MThd").unwrap();

        let written = dir.path().join("written.mid");
        write_atomic(&written, b"MThd").unwrap();

        assert_eq!(mode(&written), mode(&plain));
    }

    #[cfg(unix)]
    #[test]
    fn test_replaced_file_keeps_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mid");
        std::fs::write(&path, b"stale").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640)).unwrap();

        Sequence::new(480).unwrap().write_to_file(&path).unwrap();

        assert_eq!(mode(&path), 0o640);
    }
}
