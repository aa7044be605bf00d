use std::io::{self, Write};
use std::path::Path;

use crate::dynamics::state::BodyState;
use crate::sim::timeline::Snapshot;

/// Write timeline frames in CSV format.
///
/// Columns: time, phase, thrust,
///          {first,second,payload,satellite}_{x,y,z,vx,vy,vz},
///          first_state, second_state
pub fn write_frames<W: Write>(writer: &mut W, frames: &[Snapshot]) -> io::Result<()> {
    write!(writer, "time,phase,thrust")?;
    for body in ["first", "second", "payload", "satellite"] {
        for col in ["x", "y", "z", "vx", "vy", "vz"] {
            write!(writer, ",{body}_{col}")?;
        }
    }
    writeln!(writer, ",first_state,second_state")?;

    for s in frames {
        write!(
            writer,
            "{:.4},{},{}",
            s.time,
            s.phase.as_str(),
            s.thrust.map_or("none", |t| t.as_str()),
        )?;
        for body in [&s.first_stage, &s.second_stage, &s.payload, &s.satellite] {
            write_body(writer, body)?;
        }
        writeln!(
            writer,
            ",{},{}",
            s.first_stage_phase.as_str(),
            s.second_stage_phase.as_str()
        )?;
    }

    Ok(())
}

fn write_body<W: Write>(writer: &mut W, b: &BodyState) -> io::Result<()> {
    write!(
        writer,
        ",{:.4},{:.4},{:.4},{:.4},{:.4},{:.4}",
        b.position.x, b.position.y, b.position.z,
        b.velocity.x, b.velocity.y, b.velocity.z,
    )
}

/// Write frames to a CSV file at the given path.
pub fn write_frames_file(path: &Path, frames: &[Snapshot]) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_frames(&mut file, frames)?;
    file.flush()
}
