//! SMF track chunk decoding and note-pairing checks.

use super::error::{SmfFormatError, SmfWarning};
use super::types::{SmfTrackInfo, SmfValidationReport};
use crate::smf::event::{meta, status};
use crate::smf::vlq::read_vlq;
use crate::smf::{Event, TrackEvent};

/// Decode one `MTrk` body occupying `data[start..end]`.
pub(super) fn validate_track(
    data: &[u8],
    start: usize,
    end: usize,
    index: usize,
    report: &mut SmfValidationReport,
) -> Result<SmfTrackInfo, SmfFormatError> {
    let data = &data[..end];
    let mut info = SmfTrackInfo::new(index, (end - start) as u32);
    let mut pos = start;
    let mut running: Option<u8> = None;
    let mut tick: u64 = 0;
    // Delta carried over from events that are read but not decoded.
    let mut carry: u32 = 0;
    let mut held: Vec<(u8, u8)> = Vec::new();

    while pos < end {
        if info.has_end_of_track {
            report.add_warning(SmfWarning::DataAfterEndOfTrack {
                track: index,
                bytes: end - pos,
            });
            break;
        }

        let (delta, used) = read_vlq(data, pos).ok_or(SmfFormatError::InvalidVarLen {
            track: index,
            offset: pos,
        })?;
        pos += used;
        tick += u64::from(delta);
        carry = carry.saturating_add(delta);

        let event_offset = pos;
        let first = *data.get(pos).ok_or(SmfFormatError::EventTruncated {
            track: index,
            offset: event_offset,
        })?;

        if first == meta::PREFIX {
            let meta_type = *data.get(pos + 1).ok_or(SmfFormatError::EventTruncated {
                track: index,
                offset: event_offset,
            })?;
            let (length, used) = read_vlq(data, pos + 2).ok_or(SmfFormatError::InvalidVarLen {
                track: index,
                offset: pos + 2,
            })?;
            let body_start = pos + 2 + used;
            let body_end = body_start + length as usize;
            if body_end > end {
                return Err(SmfFormatError::EventTruncated {
                    track: index,
                    offset: event_offset,
                });
            }
            let body = &data[body_start..body_end];
            pos = body_end;
            running = None;

            match meta_type {
                meta::TEMPO => {
                    if length != 3 {
                        report.add_error(SmfFormatError::InvalidTempoLength {
                            track: index,
                            length,
                        });
                        info.other_events += 1;
                        continue;
                    }
                    let us_per_beat = u32::from_be_bytes([0, body[0], body[1], body[2]]);
                    if index != 0 {
                        report.add_warning(SmfWarning::TempoOutsideControlTrack { track: index });
                    }
                    if report.tempo_us_per_beat.is_none() {
                        report.tempo_us_per_beat = Some(us_per_beat);
                    }
                    info.events
                        .push(TrackEvent::new(carry, Event::Tempo { us_per_beat }));
                    carry = 0;
                }
                meta::END_OF_TRACK => {
                    info.has_end_of_track = true;
                }
                _ => {
                    info.other_events += 1;
                }
            }
            continue;
        }

        if first == status::SYSEX || first == status::SYSEX_ESCAPE {
            let (length, used) = read_vlq(data, pos + 1).ok_or(SmfFormatError::InvalidVarLen {
                track: index,
                offset: pos + 1,
            })?;
            let body_end = pos + 1 + used + length as usize;
            if body_end > end {
                return Err(SmfFormatError::EventTruncated {
                    track: index,
                    offset: event_offset,
                });
            }
            pos = body_end;
            running = None;
            info.other_events += 1;
            continue;
        }

        let status_byte = if first & 0x80 != 0 {
            pos += 1;
            first
        } else {
            running.ok_or(SmfFormatError::MissingRunningStatus {
                track: index,
                offset: event_offset,
            })?
        };
        if status_byte >= status::SYSEX {
            return Err(SmfFormatError::InvalidStatus {
                track: index,
                offset: event_offset,
                status: status_byte,
            });
        }
        running = Some(status_byte);

        let kind = status_byte & 0xF0;
        let channel = status_byte & 0x0F;
        let data_len = match kind {
            status::PROGRAM_CHANGE | status::CHANNEL_PRESSURE => 1,
            status::NOTE_OFF
            | status::NOTE_ON
            | status::POLY_PRESSURE
            | status::CONTROL_CHANGE
            | status::PITCH_BEND => 2,
            _ => {
                return Err(SmfFormatError::InvalidStatus {
                    track: index,
                    offset: event_offset,
                    status: status_byte,
                })
            }
        };
        if pos + data_len > end {
            return Err(SmfFormatError::EventTruncated {
                track: index,
                offset: event_offset,
            });
        }
        let args = &data[pos..pos + data_len];
        for (i, &value) in args.iter().enumerate() {
            if value & 0x80 != 0 {
                return Err(SmfFormatError::InvalidDataByte {
                    track: index,
                    offset: pos + i,
                    value,
                });
            }
        }
        pos += data_len;

        if let Err(slot) = info.channels.binary_search(&channel) {
            info.channels.insert(slot, channel);
        }

        let event = match kind {
            status::NOTE_ON => Event::NoteOn {
                channel,
                key: args[0],
                velocity: args[1],
            },
            status::NOTE_OFF => Event::NoteOff {
                channel,
                key: args[0],
                velocity: args[1],
            },
            status::PROGRAM_CHANGE => {
                info.programs.push(args[0]);
                Event::ProgramChange {
                    channel,
                    program: args[0],
                }
            }
            _ => {
                info.other_events += 1;
                continue;
            }
        };

        if let Some(key) = event.key() {
            if event.is_note_start() {
                info.note_on_count += 1;
                if held.contains(&(channel, key)) {
                    report.add_error(SmfFormatError::NoteAlreadyHeld {
                        track: index,
                        channel,
                        key,
                        tick,
                    });
                } else {
                    held.push((channel, key));
                }
            } else {
                info.note_off_count += 1;
                if let Some(slot) = held.iter().position(|&n| n == (channel, key)) {
                    held.remove(slot);
                } else {
                    report.add_warning(SmfWarning::UnmatchedNoteOff {
                        track: index,
                        channel,
                        key,
                        tick,
                    });
                }
            }
        }

        info.events.push(TrackEvent::new(carry, event));
        carry = 0;
    }

    info.total_ticks = tick;

    if !info.has_end_of_track {
        report.add_error(SmfFormatError::MissingEndOfTrack { track: index });
    }
    for (channel, key) in held {
        report.add_error(SmfFormatError::DanglingNote {
            track: index,
            channel,
            key,
        });
    }

    Ok(info)
}
