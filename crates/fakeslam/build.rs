/// Generates the two canned point-cloud maps served by the fake SLAM service.
///
/// Both maps are written as binary PCD v0.7 files into the crate's `OUT_DIR`
/// and embedded into the library with `include_bytes!`. Generation is fully
/// deterministic: the same build always produces byte-identical artifacts, so
/// streamed maps can be compared against the embedded blobs in tests.
///
/// # Artifacts
///
/// - `small.pcd`: a few thousand points, well under one 1 MiB stream chunk.
/// - `large.pcd`: enough points to span several chunks, with a short final
///   chunk.
///
/// # Layout
///
/// Points trace the walls of a square room, lap after lap, rising a few
/// centimetres per lap. Each point is `x y z` as little-endian `f32` plus a
/// packed `rgb` `u32` that encodes which wall it belongs to.
use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

const SMALL_POINTS: u32 = 1_000;
const LARGE_POINTS: u32 = 180_000;
const ROOM_EXTENT_M: f32 = 4.0;
const LAPS: f32 = 32.0;
const LAP_RISE_M: f32 = 0.05;
const WALL_COLORS: [u32; 4] = [0x00ff_0000, 0x0000_ff00, 0x0000_00ff, 0x00ff_ffff];

fn main() -> io::Result<()> {
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = PathBuf::from(env::var("OUT_DIR").map_err(io::Error::other)?);
    fs::write(out_dir.join("small.pcd"), render_pcd(SMALL_POINTS))?;
    fs::write(out_dir.join("large.pcd"), render_pcd(LARGE_POINTS))?;
    Ok(())
}

fn render_pcd(points: u32) -> Vec<u8> {
    let header = format!(
        "# .PCD v0.7 - Point Cloud Data file format\n\
         VERSION 0.7\n\
         FIELDS x y z rgb\n\
         SIZE 4 4 4 4\n\
         TYPE F F F U\n\
         COUNT 1 1 1 1\n\
         WIDTH {points}\n\
         HEIGHT 1\n\
         VIEWPOINT 0 0 0 1 0 0 0\n\
         POINTS {points}\n\
         DATA binary\n"
    );

    let mut out = header.into_bytes();
    out.reserve(points as usize * 16);

    for i in 0..points {
        let progress = (i as f32 / points as f32) * LAPS;
        let lap = progress.floor();
        // Position along the four walls, in [0, 4).
        let along = progress.fract() * 4.0;
        let wall = (along as usize).min(3);
        let offset = along - wall as f32;

        let (x, y) = match wall {
            0 => (offset * ROOM_EXTENT_M, 0.0),
            1 => (ROOM_EXTENT_M, offset * ROOM_EXTENT_M),
            2 => ((1.0 - offset) * ROOM_EXTENT_M, ROOM_EXTENT_M),
            _ => (0.0, (1.0 - offset) * ROOM_EXTENT_M),
        };
        let z = lap * LAP_RISE_M;

        out.extend_from_slice(&x.to_le_bytes());
        out.extend_from_slice(&y.to_le_bytes());
        out.extend_from_slice(&z.to_le_bytes());
        out.extend_from_slice(&WALL_COLORS[wall].to_le_bytes());
    }

    out
}
