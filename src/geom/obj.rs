//! Line-oriented mesh text loader.
//!
//! Recognized tags: `v x y z`, `vn x y z` and `f a/_/na b/_/nb c/_/nc`
//! (1-based indices, texture and normal sub-indices optional). Every other
//! tag is ignored. Only pre-triangulated input is supported: faces with any
//! other vertex count are skipped with a warning.

use super::Triangle;
use crate::util::{DVec3, Error, Result};

/// Parse mesh text into object-space triangles.
pub fn parse_mesh(text: &str) -> Result<Vec<Triangle>> {
    let mut positions: Vec<DVec3> = Vec::new();
    let mut normals: Vec<DVec3> = Vec::new();
    let mut triangles = Vec::new();
    let mut skipped = 0usize;

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let mut parts = raw.split_whitespace();
        let Some(tag) = parts.next() else { continue };

        match tag {
            "v" => positions.push(parse_vec3(parts, line_no)?),
            "vn" => normals.push(parse_vec3(parts, line_no)?),
            "f" => {
                let refs: Vec<&str> = parts.collect();
                if refs.len() != 3 {
                    tracing::warn!(line = line_no, vertices = refs.len(), "skipping non-triangle face");
                    skipped += 1;
                    continue;
                }
                let a = resolve_ref(refs[0], &positions, &normals, line_no)?;
                let b = resolve_ref(refs[1], &positions, &normals, line_no)?;
                let c = resolve_ref(refs[2], &positions, &normals, line_no)?;
                triangles.push(Triangle {
                    pos_a: a.0,
                    pos_b: b.0,
                    pos_c: c.0,
                    normal_a: a.1,
                    normal_b: b.1,
                    normal_c: c.1,
                });
            }
            _ => {}
        }
    }

    tracing::debug!(
        vertices = positions.len(),
        normals = normals.len(),
        triangles = triangles.len(),
        skipped,
        "parsed mesh"
    );
    Ok(triangles)
}

fn parse_vec3<'a>(mut parts: impl Iterator<Item = &'a str>, line: usize) -> Result<DVec3> {
    let mut next = || -> Result<f64> {
        let tok = parts.next().ok_or_else(|| Error::parse(line, "expected 3 components"))?;
        tok.parse::<f64>()
            .map_err(|e| Error::parse(line, format!("invalid number '{tok}': {e}")))
    };
    Ok(DVec3::new(next()?, next()?, next()?))
}

/// Resolve one `v[/vt[/vn]]` reference to (position, normal).
fn resolve_ref(
    token: &str,
    positions: &[DVec3],
    normals: &[DVec3],
    line: usize,
) -> Result<(DVec3, DVec3)> {
    let mut fields = token.split('/');
    let pos_idx = fields.next().unwrap_or_default();
    let _texcoord = fields.next();
    let normal_idx = fields.next().filter(|s| !s.is_empty());

    let position = lookup(pos_idx, positions, "vertex", line)?;
    let normal = match normal_idx {
        Some(idx) => lookup(idx, normals, "normal", line)?,
        None => DVec3::ZERO,
    };
    Ok((position, normal))
}

fn lookup(index: &str, pool: &[DVec3], what: &str, line: usize) -> Result<DVec3> {
    let one_based: usize = index
        .parse()
        .map_err(|e| Error::parse(line, format!("invalid {what} index '{index}': {e}")))?;
    one_based
        .checked_sub(1)
        .and_then(|i| pool.get(i))
        .copied()
        .ok_or_else(|| {
            Error::parse(line, format!("{what} index {one_based} out of range (have {})", pool.len()))
        })
}
