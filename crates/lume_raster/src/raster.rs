//! The rasterization pipeline.
//!
//! `Rasterizer` is the render context: it owns the framebuffer, the
//! depth-test flag, and a fixed-size worker pool. A draw call runs the
//! vertex shader over the object's vertices, then rasterizes each
//! triangle: perspective divide, bounding box, barycentric coverage,
//! perspective-correct attribute interpolation, depth test, fragment
//! shader.
//!
//! Parallelism: the bounding box is partitioned into disjoint
//! horizontal band rectangles, one per worker. Each band maps to a
//! contiguous run of framebuffer rows, so the bands borrow disjoint
//! mutable slices of the color/depth buffers and workers write without
//! locks. The dispatching thread blocks until every band completes
//! before moving to the next triangle.

use crate::attribs::Attribs;
use crate::framebuffer::{pack_color, Framebuffer};
use crate::object::Object;
use crate::shader::{FragmentShader, ShaderProgram};
use crate::uniforms::Uniforms;
use glam::{Vec2, Vec3, Vec4};
use thiserror::Error;

/// Doubled signed areas below this are treated as degenerate.
const DEGENERATE_AREA_EPS: f32 = 1e-12;

/// Clip-space w below this means the vertex sits on the eye plane.
const MIN_CLIP_W: f32 = 1e-6;

/// Errors a draw call can raise before any pixel is touched.
#[derive(Error, Debug)]
pub enum DrawError {
    #[error("object has no position data in attribute slot 0")]
    MissingPositions,

    #[error("triangle index {index} out of range for {vertices} vertices")]
    IndexOutOfRange { index: u32, vertices: usize },

    #[error("failed to build worker pool")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// One vertex after the vertex stage and viewport mapping.
#[derive(Clone)]
struct ScreenVertex {
    /// x, y in pixel coordinates (y up), z in NDC
    pos: Vec3,
    inv_w: f32,
    attribs: Attribs,
}

/// Everything a band worker needs to shade fragments. Read-only.
struct FragmentContext<'a> {
    tri: [Vec2; 3],
    depth: [f32; 3],
    inv_w: [f32; 3],
    attribs: [&'a Attribs; 3],
    /// Doubled signed area of the screen triangle
    denom: f32,
    x0: u32,
    x1: u32,
    width: u32,
    fs: FragmentShader,
    uniforms: &'a Uniforms,
    depth_test: bool,
}

/// A band rectangle plus its slice of the framebuffer.
///
/// The slice covers full storage rows `(h-1-y1)..=(h-1-y0)`; bands of
/// one dispatch are pairwise disjoint by construction.
struct BandView<'a> {
    y0: u32,
    y1: u32,
    color: &'a mut [u32],
    depth: &'a mut [f32],
}

/// Software rasterizer render context.
pub struct Rasterizer {
    framebuffer: Framebuffer,
    pool: rayon::ThreadPool,
    depth_test: bool,
}

impl Rasterizer {
    /// Create a rasterizer with a fixed-size worker pool.
    ///
    /// The pool lives as long as the rasterizer; workers park between
    /// draw calls.
    pub fn new(width: u32, height: u32, workers: usize) -> Result<Self, DrawError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .build()?;
        Ok(Self {
            framebuffer: Framebuffer::new(width, height),
            pool,
            depth_test: false,
        })
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn width(&self) -> u32 {
        self.framebuffer.width()
    }

    pub fn height(&self) -> u32 {
        self.framebuffer.height()
    }

    pub fn worker_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Enable the depth test for subsequent draws.
    pub fn enable_depth_test(&mut self) {
        self.depth_test = true;
    }

    pub fn disable_depth_test(&mut self) {
        self.depth_test = false;
    }

    /// Clear the color buffer to the given color and reset all depths.
    pub fn clear(&mut self, color: Vec4) {
        self.framebuffer.clear(color);
        self.framebuffer.clear_depth();
    }

    /// Draw the triangles of the given object with the given program.
    pub fn draw(&mut self, object: &Object, program: &ShaderProgram) -> Result<(), DrawError> {
        let vertex_count = object.vertex_count();
        if vertex_count == 0 {
            return Err(DrawError::MissingPositions);
        }
        for tri in object.indices() {
            for &index in tri {
                if index as usize >= vertex_count {
                    return Err(DrawError::IndexOutOfRange {
                        index,
                        vertices: vertex_count,
                    });
                }
            }
        }

        // Vertex stage: run the vertex shader once per vertex.
        let width = self.framebuffer.width();
        let height = self.framebuffer.height();
        let mut shaded: Vec<Option<ScreenVertex>> = Vec::with_capacity(vertex_count);
        for vertex in 0..vertex_count {
            let input = object.vertex_attribs(vertex);
            let mut out = Attribs::new();
            let clip = (program.vs)(&program.uniforms, &input, &mut out);
            shaded.push(to_screen(clip, out, width, height));
        }

        let Rasterizer {
            framebuffer,
            pool,
            depth_test,
        } = self;

        for tri in object.indices() {
            let [a, b, c] = [
                &shaded[tri[0] as usize],
                &shaded[tri[1] as usize],
                &shaded[tri[2] as usize],
            ];
            // A vertex on the eye plane degenerates the triangle.
            let (Some(a), Some(b), Some(c)) = (a, b, c) else {
                continue;
            };
            rasterize_triangle(framebuffer, pool, *depth_test, [a, b, c], program);
        }

        Ok(())
    }
}

/// Perspective divide and viewport mapping.
///
/// NDC [-1,1]^2 maps to pixel centers [0,W)x[0,H) with row 0 at the
/// bottom of the viewport; the vertical flip happens at framebuffer
/// addressing, not here.
fn to_screen(clip: Vec4, attribs: Attribs, width: u32, height: u32) -> Option<ScreenVertex> {
    if clip.w.abs() < MIN_CLIP_W {
        return None;
    }
    let inv_w = 1.0 / clip.w;
    let ndc = clip.truncate() * inv_w;
    Some(ScreenVertex {
        pos: Vec3::new(
            (ndc.x + 1.0) * 0.5 * width as f32 - 0.5,
            (ndc.y + 1.0) * 0.5 * height as f32 - 0.5,
            ndc.z,
        ),
        inv_w,
        attribs,
    })
}

/// Barycentric coordinates (s, t1, t2) of `pt` via the signed-area
/// formula. `denom` is the doubled signed area of the triangle.
fn barycentric(tri: &[Vec2; 3], denom: f32, pt: Vec2) -> Vec3 {
    let [a, b, c] = *tri;
    let t1 = (pt.x * (c.y - a.y) + pt.y * (a.x - c.x) - a.x * c.y + a.y * c.x) / denom;
    let t2 = -(pt.x * (b.y - a.y) + pt.y * (a.x - b.x) - a.x * b.y + a.y * b.x) / denom;
    Vec3::new(1.0 - t1 - t2, t1, t2)
}

fn doubled_signed_area(tri: &[Vec2; 3]) -> f32 {
    let [a, b, c] = *tri;
    a.x * (b.y - c.y) + a.y * (c.x - b.x) + b.x * c.y - b.y * c.x
}

/// Partition the inclusive row range [y0, y1] into at most `max_bands`
/// contiguous, pairwise disjoint bands whose union is the full range.
fn split_bands(y0: u32, y1: u32, max_bands: usize) -> Vec<(u32, u32)> {
    let rows = y1 - y0 + 1;
    let bands = (max_bands.max(1) as u32).min(rows);
    let base = rows / bands;
    let extra = rows % bands;

    let mut out = Vec::with_capacity(bands as usize);
    let mut start = y0;
    for band in 0..bands {
        let height = base + u32::from(band < extra);
        out.push((start, start + height - 1));
        start += height;
    }
    out
}

fn rasterize_triangle(
    framebuffer: &mut Framebuffer,
    pool: &rayon::ThreadPool,
    depth_test: bool,
    verts: [&ScreenVertex; 3],
    program: &ShaderProgram,
) {
    let width = framebuffer.width();
    let height = framebuffer.height();

    let tri = [
        Vec2::new(verts[0].pos.x, verts[0].pos.y),
        Vec2::new(verts[1].pos.x, verts[1].pos.y),
        Vec2::new(verts[2].pos.x, verts[2].pos.y),
    ];

    // Degenerate (collinear) triangles cover nothing.
    let denom = doubled_signed_area(&tri);
    if denom.abs() < DEGENERATE_AREA_EPS {
        return;
    }

    // Clamped inclusive pixel bounding box; the sole visited region.
    let min_x = tri[0].x.min(tri[1].x).min(tri[2].x);
    let max_x = tri[0].x.max(tri[1].x).max(tri[2].x);
    let min_y = tri[0].y.min(tri[1].y).min(tri[2].y);
    let max_y = tri[0].y.max(tri[1].y).max(tri[2].y);

    if max_x < 0.0 || max_y < 0.0 || min_x >= width as f32 || min_y >= height as f32 {
        return;
    }
    let x0 = min_x.floor().max(0.0) as u32;
    let x1 = (max_x.ceil() as i64).min(width as i64 - 1) as u32;
    let y0 = min_y.floor().max(0.0) as u32;
    let y1 = (max_y.ceil() as i64).min(height as i64 - 1) as u32;
    if x0 > x1 || y0 > y1 {
        return;
    }

    let ctx = FragmentContext {
        tri,
        depth: [verts[0].pos.z, verts[1].pos.z, verts[2].pos.z],
        inv_w: [verts[0].inv_w, verts[1].inv_w, verts[2].inv_w],
        attribs: [&verts[0].attribs, &verts[1].attribs, &verts[2].attribs],
        denom,
        x0,
        x1,
        width,
        fs: program.fs,
        uniforms: &program.uniforms,
        depth_test,
    };

    let bands = split_bands(y0, y1, pool.current_num_threads());
    let views = carve_bands(
        &mut framebuffer.color,
        &mut framebuffer.depth,
        width,
        height,
        &bands,
    );

    // The scope is the per-triangle barrier: it returns only after
    // every band worker has finished.
    pool.scope(|scope| {
        let ctx = &ctx;
        for view in views {
            scope.spawn(move |_| rasterize_band(view, ctx));
        }
    });
}

/// Split the color/depth buffers into per-band row slices.
///
/// `bands` are inclusive pixel-y ranges, ascending. Pixel row y lives
/// at storage row `h-1-y`, so bands are carved from the buffers in
/// descending-y order to walk storage front to back.
fn carve_bands<'a>(
    color: &'a mut [u32],
    depth: &'a mut [f32],
    width: u32,
    height: u32,
    bands: &[(u32, u32)],
) -> Vec<BandView<'a>> {
    let mut views = Vec::with_capacity(bands.len());
    let mut color_rest = color;
    let mut depth_rest = depth;
    let mut consumed_rows = 0u32;

    for &(y0, y1) in bands.iter().rev() {
        let r0 = height - 1 - y1;
        let r1 = height - 1 - y0;
        let skip = ((r0 - consumed_rows) * width) as usize;
        let take = ((r1 - r0 + 1) * width) as usize;

        let (_, tail) = std::mem::take(&mut color_rest).split_at_mut(skip);
        let (band_color, rest) = tail.split_at_mut(take);
        color_rest = rest;

        let (_, tail) = std::mem::take(&mut depth_rest).split_at_mut(skip);
        let (band_depth, rest) = tail.split_at_mut(take);
        depth_rest = rest;

        consumed_rows = r1 + 1;
        views.push(BandView {
            y0,
            y1,
            color: band_color,
            depth: band_depth,
        });
    }

    views
}

/// Rasterize one band: coverage, interpolation, depth test, shading.
fn rasterize_band(view: BandView<'_>, ctx: &FragmentContext<'_>) {
    let BandView {
        y0,
        y1,
        color,
        depth,
    } = view;

    for y in y0..=y1 {
        // Band-local storage row: top pixel row of the band comes first.
        let row = ((y1 - y) * ctx.width) as usize;
        for x in ctx.x0..=ctx.x1 {
            let phi = barycentric(&ctx.tri, ctx.denom, Vec2::new(x as f32, y as f32));
            if phi.x < 0.0 || phi.y < 0.0 || phi.z < 0.0 {
                continue;
            }

            // Perspective-correct weights: phi_i / w_i, renormalized.
            let weights = phi * Vec3::from_array(ctx.inv_w);
            let weight_sum = weights.x + weights.y + weights.z;
            if weight_sum.abs() < f32::EPSILON {
                continue;
            }

            let index = row + x as usize;
            let frag_depth = weights.dot(Vec3::from_array(ctx.depth)) / weight_sum;
            if ctx.depth_test && !(frag_depth < depth[index]) {
                continue;
            }

            let frag = interpolate_attribs(ctx.attribs, weights, weight_sum);
            let frag_color = (ctx.fs)(ctx.uniforms, &frag);

            color[index] = pack_color(frag_color);
            if ctx.depth_test {
                depth[index] = frag_depth;
            }
        }
    }
}

/// Perspective-correct interpolation of every out-attribute slot.
fn interpolate_attribs(attribs: [&Attribs; 3], weights: Vec3, weight_sum: f32) -> Attribs {
    let slots = attribs[0]
        .len()
        .max(attribs[1].len())
        .max(attribs[2].len());

    let mut frag = Attribs::new();
    for slot in 0..slots {
        let dim = attribs[0]
            .dim(slot)
            .max(attribs[1].dim(slot))
            .max(attribs[2].dim(slot));
        if dim == 0 {
            continue;
        }
        let value = (attribs[0].raw(slot) * weights.x
            + attribs[1].raw(slot) * weights.y
            + attribs[2].raw(slot) * weights.z)
            / weight_sum;
        frag.set_raw(slot, value, dim);
    }
    frag
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::{fs_constant, fs_identity, vs_color, vs_identity};

    const RED: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);

    fn full_quad_positions() -> Vec<Vec4> {
        vec![
            Vec4::new(-1.0, -1.0, 0.0, 1.0),
            Vec4::new(1.0, -1.0, 0.0, 1.0),
            Vec4::new(-1.0, 1.0, 0.0, 1.0),
        ]
    }

    fn constant_program(color: Vec4) -> ShaderProgram {
        let mut program = ShaderProgram::new(vs_identity, fs_constant);
        program.set_uniform("color", color);
        program
    }

    #[test]
    fn test_coverage_inside_outside() {
        let mut raster = Rasterizer::new(8, 8, 2).unwrap();
        raster.clear(Vec4::ZERO);

        let mut object = Object::new();
        object.set_attribs(0, &full_quad_positions());
        object.set_indices(&[[0, 1, 2]]);

        raster.draw(&object, &constant_program(RED)).unwrap();

        // Bottom-left corner is strictly inside the triangle
        assert_eq!(raster.framebuffer().pixel(0, 0), pack_color(RED));
        // Top-right corner is strictly outside (beyond the diagonal)
        assert_eq!(raster.framebuffer().pixel(7, 7), 0);
    }

    #[test]
    fn test_degenerate_triangle_covers_nothing() {
        let mut raster = Rasterizer::new(8, 8, 2).unwrap();
        raster.clear(Vec4::ZERO);

        let mut object = Object::new();
        // Collinear vertices: zero signed area
        object.set_attribs(
            0,
            &[
                Vec4::new(-1.0, -1.0, 0.0, 1.0),
                Vec4::new(0.0, 0.0, 0.0, 1.0),
                Vec4::new(1.0, 1.0, 0.0, 1.0),
            ],
        );
        object.set_indices(&[[0, 1, 2]]);

        raster.draw(&object, &constant_program(RED)).unwrap();

        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(raster.framebuffer().pixel(x, y), 0);
            }
        }
    }

    #[test]
    fn test_index_out_of_range_is_hard_error() {
        let mut raster = Rasterizer::new(8, 8, 1).unwrap();

        let mut object = Object::new();
        object.set_attribs(0, &full_quad_positions());
        object.set_indices(&[[0, 1, 7]]);

        let err = raster.draw(&object, &constant_program(RED)).unwrap_err();
        assert!(matches!(
            err,
            DrawError::IndexOutOfRange {
                index: 7,
                vertices: 3
            }
        ));
    }

    #[test]
    fn test_depth_test_idempotent_and_strict() {
        let mut raster = Rasterizer::new(8, 8, 2).unwrap();
        raster.enable_depth_test();
        raster.clear(Vec4::ZERO);

        let mut object = Object::new();
        object.set_attribs(0, &full_quad_positions());
        object.set_indices(&[[0, 1, 2]]);

        raster.draw(&object, &constant_program(RED)).unwrap();
        let after_first: Vec<u32> = (0..8)
            .flat_map(|y| (0..8).map(move |x| (x, y)))
            .map(|(x, y)| raster.framebuffer().pixel(x, y))
            .collect();

        // Same geometry at the same depth, different color: the strict
        // less-than comparison must reject every fragment.
        let green = Vec4::new(0.0, 1.0, 0.0, 1.0);
        raster.draw(&object, &constant_program(green)).unwrap();
        let after_second: Vec<u32> = (0..8)
            .flat_map(|y| (0..8).map(move |x| (x, y)))
            .map(|(x, y)| raster.framebuffer().pixel(x, y))
            .collect();

        assert_eq!(after_first, after_second);
    }

    #[test]
    fn test_nearer_depth_wins() {
        let mut raster = Rasterizer::new(8, 8, 2).unwrap();
        raster.enable_depth_test();
        raster.clear(Vec4::ZERO);

        let mut far = Object::new();
        let positions: Vec<Vec4> = full_quad_positions()
            .iter()
            .map(|p| Vec4::new(p.x, p.y, 0.5, p.w))
            .collect();
        far.set_attribs(0, &positions);
        far.set_indices(&[[0, 1, 2]]);
        raster.draw(&far, &constant_program(RED)).unwrap();

        let mut near = Object::new();
        near.set_attribs(0, &full_quad_positions()); // z = 0.0, nearer
        near.set_indices(&[[0, 1, 2]]);
        let green = Vec4::new(0.0, 1.0, 0.0, 1.0);
        raster.draw(&near, &constant_program(green)).unwrap();

        assert_eq!(raster.framebuffer().pixel(0, 0), pack_color(green));
    }

    #[test]
    fn test_perspective_correct_interpolation() {
        let size = 64u32;
        let mut raster = Rasterizer::new(size, size, 2).unwrap();
        raster.clear(Vec4::ZERO);

        // Vertices with distinct w; red channel 0 / 1 / 0.
        let w = [1.0f32, 2.0, 4.0];
        let mut object = Object::new();
        object.set_attribs(
            0,
            &[
                Vec4::new(-w[0], -w[0], 0.0, w[0]),
                Vec4::new(w[1], -w[1], 0.0, w[1]),
                Vec4::new(-w[2], w[2], 0.0, w[2]),
            ],
        );
        object.set_attribs(
            1,
            &[
                Vec4::new(0.0, 0.0, 0.0, 1.0),
                Vec4::new(1.0, 0.0, 0.0, 1.0),
                Vec4::new(0.0, 0.0, 0.0, 1.0),
            ],
        );
        object.set_indices(&[[0, 1, 2]]);

        let program = ShaderProgram::new(vs_color, fs_identity);
        raster.draw(&object, &program).unwrap();

        // Recompute both interpolations at one interior pixel.
        let to_px = |ndc: f32| (ndc + 1.0) * 0.5 * size as f32 - 0.5;
        let tri = [
            Vec2::new(to_px(-1.0), to_px(-1.0)),
            Vec2::new(to_px(1.0), to_px(-1.0)),
            Vec2::new(to_px(-1.0), to_px(1.0)),
        ];
        let (px, py) = (16u32, 16u32);
        let phi = barycentric(
            &tri,
            doubled_signed_area(&tri),
            Vec2::new(px as f32, py as f32),
        );
        assert!(phi.min_element() > 0.0, "test pixel must be interior");

        let reds = [0.0f32, 1.0, 0.0];
        let naive: f32 = phi.x * reds[0] + phi.y * reds[1] + phi.z * reds[2];
        let weights = phi * Vec3::new(1.0 / w[0], 1.0 / w[1], 1.0 / w[2]);
        let correct = weights.dot(Vec3::from_array(reds)) / (weights.x + weights.y + weights.z);

        let pixel = raster.framebuffer().pixel(px, py);
        let red = ((pixel >> 24) & 0xFF) as f32 / 255.0;

        assert!((red - correct).abs() < 2.0 / 255.0, "red={red} correct={correct}");
        // The distinguishing half: naive interpolation must not match.
        assert!((naive - correct).abs() > 8.0 / 255.0);
        assert!((red - naive).abs() > 4.0 / 255.0);
    }

    #[test]
    fn test_band_partition_disjoint_union() {
        for (y0, y1) in [(0u32, 0u32), (0, 6), (3, 63), (10, 10)] {
            for workers in [1usize, 2, 3, 4, 16] {
                let bands = split_bands(y0, y1, workers);

                // Union covers exactly [y0, y1] with no overlap.
                let mut covered = Vec::new();
                for &(b0, b1) in &bands {
                    assert!(b0 <= b1);
                    covered.extend(b0..=b1);
                }
                let expected: Vec<u32> = (y0..=y1).collect();
                assert_eq!(covered, expected, "y0={y0} y1={y1} workers={workers}");
                assert!(bands.len() <= workers.max(1));
            }
        }
    }

    #[test]
    fn test_worker_counts_agree_on_output() {
        // Same scene rasterized with 1 and 4 workers must be identical.
        let mut object = Object::new();
        object.set_attribs(
            0,
            &[
                Vec4::new(-0.9, -0.8, 0.0, 1.0),
                Vec4::new(0.7, -0.5, 0.0, 1.0),
                Vec4::new(0.1, 0.9, 0.0, 1.0),
            ],
        );
        object.set_indices(&[[0, 1, 2]]);
        let program = constant_program(RED);

        let mut single = Rasterizer::new(32, 32, 1).unwrap();
        single.clear(Vec4::ZERO);
        single.draw(&object, &program).unwrap();

        let mut multi = Rasterizer::new(32, 32, 4).unwrap();
        multi.clear(Vec4::ZERO);
        multi.draw(&object, &program).unwrap();

        for y in 0..32 {
            for x in 0..32 {
                assert_eq!(
                    single.framebuffer().pixel(x, y),
                    multi.framebuffer().pixel(x, y)
                );
            }
        }
    }
}
