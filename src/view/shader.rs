//! Shader program compilation and by-name uniform access.
//!
//! A [`ShaderProgram`] wraps two WGSL stage sources (vertex + fragment) that
//! have been parsed and validated through naga, plus the uniform block layout
//! reflected from them. Uniform values are staged CPU-side and uploaded by
//! the renderer; see [`crate::view::render::ProgramBinding`].
//!
//! Uniform names resolve against the reflected layout on every call. An
//! unknown name is a silent no-op, mirroring the permissive uniform-location
//! contract of classic GL drivers.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read shader source {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{stage} stage compilation failed:\n{message}")]
    Compile { stage: ShaderStage, message: String },
    #[error("program linking failed: {0}")]
    Link(String),
}

/// Read a stage source file wholesale. Missing or unreadable files surface
/// as an explicit error; the caller decides whether that is fatal.
pub fn read_shader_source(path: impl AsRef<Path>) -> Result<String, ShaderError> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Shape of a uniform block member, as reflected from WGSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UniformKind {
    Float,
    Int,
    UInt,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl UniformKind {
    /// Bytes the member occupies in the buffer (WGSL uniform layout).
    fn byte_size(self) -> usize {
        match self {
            UniformKind::Float | UniformKind::Int | UniformKind::UInt => 4,
            UniformKind::Vec2 => 8,
            UniformKind::Vec3 => 12,
            UniformKind::Vec4 | UniformKind::Mat2 => 16,
            UniformKind::Mat3 => 48,
            UniformKind::Mat4 => 64,
        }
    }

    fn from_naga(inner: &naga::TypeInner) -> Option<Self> {
        use naga::{ScalarKind, TypeInner, VectorSize};
        match inner {
            TypeInner::Scalar(s) if s.width == 4 => match s.kind {
                ScalarKind::Float => Some(UniformKind::Float),
                ScalarKind::Sint => Some(UniformKind::Int),
                ScalarKind::Uint => Some(UniformKind::UInt),
                _ => None,
            },
            TypeInner::Vector { size, scalar } if scalar.kind == ScalarKind::Float && scalar.width == 4 => {
                match size {
                    VectorSize::Bi => Some(UniformKind::Vec2),
                    VectorSize::Tri => Some(UniformKind::Vec3),
                    VectorSize::Quad => Some(UniformKind::Vec4),
                }
            }
            TypeInner::Matrix { columns, rows, scalar }
                if scalar.kind == ScalarKind::Float && scalar.width == 4 && columns == rows =>
            {
                match columns {
                    VectorSize::Bi => Some(UniformKind::Mat2),
                    VectorSize::Tri => Some(UniformKind::Mat3),
                    VectorSize::Quad => Some(UniformKind::Mat4),
                }
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct UniformSlot {
    offset: usize,
    kind: UniformKind,
}

/// A compiled and linked pair of shader stages with typed uniform I/O.
///
/// Construction succeeds only when both stages parse and validate and the
/// stage interfaces agree, so any live value is usable; there is no
/// half-compiled state to guard against.
#[derive(Debug)]
pub struct ShaderProgram {
    vertex_wgsl: String,
    fragment_wgsl: String,
    vertex_entry: String,
    fragment_entry: String,
    uniforms: HashMap<String, UniformSlot>,
    block_size: usize,
    staging: Vec<u8>,
}

impl ShaderProgram {
    /// Compile both stages and link them.
    ///
    /// Each stage is parsed and validated independently; a diagnostic from
    /// naga (with source spans rendered) is returned on failure. Linking
    /// requires an entry point per stage and a consistent uniform block
    /// between the two.
    pub fn compile(vertex_src: &str, fragment_src: &str) -> Result<Self, ShaderError> {
        let vertex = compile_stage(ShaderStage::Vertex, vertex_src)?;
        let fragment = compile_stage(ShaderStage::Fragment, fragment_src)?;

        let vertex_entry = entry_point(&vertex, naga::ShaderStage::Vertex)
            .ok_or_else(|| ShaderError::Link("vertex stage declares no @vertex entry point".into()))?;
        let fragment_entry = entry_point(&fragment, naga::ShaderStage::Fragment)
            .ok_or_else(|| ShaderError::Link("fragment stage declares no @fragment entry point".into()))?;

        let mut uniforms = HashMap::new();
        let mut block_size = 0usize;
        merge_uniform_block(&vertex, ShaderStage::Vertex, &mut uniforms, &mut block_size)?;
        merge_uniform_block(&fragment, ShaderStage::Fragment, &mut uniforms, &mut block_size)?;

        tracing::debug!(
            uniforms = uniforms.len(),
            block_size,
            "shader program linked"
        );

        Ok(Self {
            vertex_wgsl: vertex_src.to_string(),
            fragment_wgsl: fragment_src.to_string(),
            vertex_entry,
            fragment_entry,
            staging: vec![0u8; block_size],
            uniforms,
            block_size,
        })
    }

    pub fn vertex_source(&self) -> &str {
        &self.vertex_wgsl
    }

    pub fn fragment_source(&self) -> &str {
        &self.fragment_wgsl
    }

    pub fn vertex_entry(&self) -> &str {
        &self.vertex_entry
    }

    pub fn fragment_entry(&self) -> &str {
        &self.fragment_entry
    }

    /// Size of the reflected uniform block in bytes.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Current staged uniform bytes, ready for upload.
    pub fn staged_bytes(&self) -> &[u8] {
        &self.staging
    }

    pub fn has_uniform(&self, name: &str) -> bool {
        self.uniforms.contains_key(name)
    }

    // ---- setters ------------------------------------------------------

    pub fn set_bool(&mut self, name: &str, value: bool) {
        let v: u32 = value as u32;
        self.write(name, &[UniformKind::Int, UniformKind::UInt], bytemuck::bytes_of(&v));
    }

    pub fn set_int(&mut self, name: &str, value: i32) {
        self.write(name, &[UniformKind::Int, UniformKind::UInt], bytemuck::bytes_of(&value));
    }

    pub fn set_float(&mut self, name: &str, value: f32) {
        self.write(name, &[UniformKind::Float], bytemuck::bytes_of(&value));
    }

    pub fn set_vec2(&mut self, name: &str, value: Vec2) {
        self.write(name, &[UniformKind::Vec2], bytemuck::cast_slice(&value.to_array()));
    }

    pub fn set_vec3(&mut self, name: &str, value: Vec3) {
        self.write(name, &[UniformKind::Vec3], bytemuck::cast_slice(&value.to_array()));
    }

    pub fn set_vec4(&mut self, name: &str, value: Vec4) {
        self.write(name, &[UniformKind::Vec4], bytemuck::cast_slice(&value.to_array()));
    }

    pub fn set_mat2(&mut self, name: &str, value: Mat2) {
        // mat2x2 columns are tightly packed (8-byte stride)
        self.write(name, &[UniformKind::Mat2], bytemuck::cast_slice(&value.to_cols_array()));
    }

    pub fn set_mat3(&mut self, name: &str, value: Mat3) {
        let Some(slot) = self.slot(name, &[UniformKind::Mat3]) else {
            return;
        };
        // mat3x3 columns sit on 16-byte strides
        let cols = value.to_cols_array();
        for c in 0..3 {
            let src = bytemuck::cast_slice(&cols[c * 3..c * 3 + 3]);
            let dst = slot.offset + c * 16;
            self.staging[dst..dst + 12].copy_from_slice(src);
        }
    }

    pub fn set_mat4(&mut self, name: &str, value: Mat4) {
        self.write(name, &[UniformKind::Mat4], bytemuck::cast_slice(&value.to_cols_array()));
    }

    // ---- getters ------------------------------------------------------

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        let slot = self.slot(name, &[UniformKind::Int, UniformKind::UInt])?;
        Some(u32::from_le_bytes(self.read::<4>(slot.offset)) != 0)
    }

    pub fn get_int(&self, name: &str) -> Option<i32> {
        let slot = self.slot(name, &[UniformKind::Int, UniformKind::UInt])?;
        Some(i32::from_le_bytes(self.read::<4>(slot.offset)))
    }

    pub fn get_float(&self, name: &str) -> Option<f32> {
        let slot = self.slot(name, &[UniformKind::Float])?;
        Some(f32::from_le_bytes(self.read::<4>(slot.offset)))
    }

    pub fn get_vec2(&self, name: &str) -> Option<Vec2> {
        let slot = self.slot(name, &[UniformKind::Vec2])?;
        Some(Vec2::from_array(self.read_floats::<2>(slot.offset)))
    }

    pub fn get_vec3(&self, name: &str) -> Option<Vec3> {
        let slot = self.slot(name, &[UniformKind::Vec3])?;
        Some(Vec3::from_array(self.read_floats::<3>(slot.offset)))
    }

    pub fn get_vec4(&self, name: &str) -> Option<Vec4> {
        let slot = self.slot(name, &[UniformKind::Vec4])?;
        Some(Vec4::from_array(self.read_floats::<4>(slot.offset)))
    }

    pub fn get_mat2(&self, name: &str) -> Option<Mat2> {
        let slot = self.slot(name, &[UniformKind::Mat2])?;
        Some(Mat2::from_cols_array(&self.read_floats::<4>(slot.offset)))
    }

    pub fn get_mat3(&self, name: &str) -> Option<Mat3> {
        let slot = self.slot(name, &[UniformKind::Mat3])?;
        let mut cols = [0.0f32; 9];
        for c in 0..3 {
            let col: [f32; 3] = self.read_floats::<3>(slot.offset + c * 16);
            cols[c * 3..c * 3 + 3].copy_from_slice(&col);
        }
        Some(Mat3::from_cols_array(&cols))
    }

    pub fn get_mat4(&self, name: &str) -> Option<Mat4> {
        let slot = self.slot(name, &[UniformKind::Mat4])?;
        Some(Mat4::from_cols_array(&self.read_floats::<16>(slot.offset)))
    }

    // ---- internals ----------------------------------------------------

    fn slot(&self, name: &str, allowed: &[UniformKind]) -> Option<UniformSlot> {
        match self.uniforms.get(name) {
            None => {
                tracing::trace!(name, "uniform not found, ignoring");
                None
            }
            Some(slot) if !allowed.contains(&slot.kind) => {
                tracing::warn!(name, kind = ?slot.kind, "uniform kind mismatch, ignoring");
                None
            }
            Some(slot) => Some(*slot),
        }
    }

    fn write(&mut self, name: &str, allowed: &[UniformKind], bytes: &[u8]) {
        if let Some(slot) = self.slot(name, allowed) {
            debug_assert_eq!(bytes.len(), slot.kind.byte_size());
            self.staging[slot.offset..slot.offset + bytes.len()].copy_from_slice(bytes);
        }
    }

    fn read<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.staging[offset..offset + N]);
        out
    }

    fn read_floats<const N: usize>(&self, offset: usize) -> [f32; N] {
        let mut out = [0.0f32; N];
        for (i, v) in out.iter_mut().enumerate() {
            *v = f32::from_le_bytes(self.read::<4>(offset + i * 4));
        }
        out
    }
}

fn compile_stage(stage: ShaderStage, source: &str) -> Result<naga::Module, ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Compile {
        stage,
        message: e.emit_to_string(source),
    })?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::default(),
    );
    validator.validate(&module).map_err(|e| ShaderError::Compile {
        stage,
        message: format!("validation error: {e}"),
    })?;

    Ok(module)
}

fn entry_point(module: &naga::Module, stage: naga::ShaderStage) -> Option<String> {
    module
        .entry_points
        .iter()
        .find(|ep| ep.stage == stage)
        .map(|ep| ep.name.clone())
}

/// Fold a stage's uniform block members into the shared layout map.
/// Both stages may declare the block; members must agree on offset and kind.
fn merge_uniform_block(
    module: &naga::Module,
    stage: ShaderStage,
    uniforms: &mut HashMap<String, UniformSlot>,
    block_size: &mut usize,
) -> Result<(), ShaderError> {
    for (_, var) in module.global_variables.iter() {
        if var.space != naga::AddressSpace::Uniform {
            continue;
        }
        let naga::TypeInner::Struct { ref members, span } = module.types[var.ty].inner else {
            continue;
        };
        *block_size = (*block_size).max(span as usize);

        for member in members {
            let Some(name) = member.name.as_deref() else {
                continue;
            };
            let Some(kind) = UniformKind::from_naga(&module.types[member.ty].inner) else {
                tracing::debug!(name, %stage, "skipping uniform member with unsupported type");
                continue;
            };
            let slot = UniformSlot {
                offset: member.offset as usize,
                kind,
            };
            match uniforms.get(name) {
                Some(existing) if existing.offset != slot.offset || existing.kind != slot.kind => {
                    return Err(ShaderError::Link(format!(
                        "uniform `{name}` declared with mismatching layout across stages \
                         ({:?} at {} vs {:?} at {})",
                        existing.kind, existing.offset, slot.kind, slot.offset
                    )));
                }
                Some(_) => {}
                None => {
                    uniforms.insert(name.to_string(), slot);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = r#"
struct Uniforms {
    model: mat4x4<f32>,
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    tint: vec4<f32>,
    axis: vec3<f32>,
    warp: mat2x2<f32>,
    basis: mat3x3<f32>,
    offset2: vec2<f32>,
    mix_amount: f32,
    mode: i32,
    flags: u32,
};
@group(0) @binding(0) var<uniform> u: Uniforms;

@vertex
fn vs_main(@location(0) pos: vec3<f32>) -> @builtin(position) vec4<f32> {
    return u.projection * u.view * u.model * vec4<f32>(pos, 1.0);
}
"#;

    const FS: &str = r#"
struct Uniforms {
    model: mat4x4<f32>,
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    tint: vec4<f32>,
    axis: vec3<f32>,
    warp: mat2x2<f32>,
    basis: mat3x3<f32>,
    offset2: vec2<f32>,
    mix_amount: f32,
    mode: i32,
    flags: u32,
};
@group(0) @binding(0) var<uniform> u: Uniforms;

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return u.tint * u.mix_amount;
}
"#;

    fn program() -> ShaderProgram {
        ShaderProgram::compile(VS, FS).expect("valid program")
    }

    #[test]
    fn compiles_and_links() {
        let p = program();
        assert_eq!(p.vertex_entry(), "vs_main");
        assert_eq!(p.fragment_entry(), "fs_main");
        assert!(p.block_size() > 0);
        assert!(p.has_uniform("model"));
        assert!(p.has_uniform("mix_amount"));
    }

    #[test]
    fn invalid_source_reports_compile_error() {
        let err = ShaderProgram::compile("not wgsl at all {", FS).unwrap_err();
        match err {
            ShaderError::Compile { stage, message } => {
                assert_eq!(stage, ShaderStage::Vertex);
                assert!(!message.is_empty());
            }
            other => panic!("expected compile error, got {other}"),
        }
    }

    #[test]
    fn missing_entry_point_is_a_link_error() {
        // valid module, but no @fragment entry point
        let fs = r#"
fn helper() -> f32 { return 1.0; }
"#;
        let err = ShaderProgram::compile(VS, fs).unwrap_err();
        assert!(matches!(err, ShaderError::Link(_)), "got {err}");
    }

    #[test]
    fn mismatched_blocks_fail_to_link() {
        // fragment declares `model` as a vec4 instead of mat4
        let fs = r#"
struct Uniforms {
    model: vec4<f32>,
};
@group(0) @binding(0) var<uniform> u: Uniforms;

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return u.model;
}
"#;
        let err = ShaderProgram::compile(VS, fs).unwrap_err();
        assert!(matches!(err, ShaderError::Link(_)), "got {err}");
    }

    #[test]
    fn scalar_round_trips() {
        let mut p = program();
        p.set_float("mix_amount", 0.75);
        assert_eq!(p.get_float("mix_amount"), Some(0.75));

        p.set_int("mode", -42);
        assert_eq!(p.get_int("mode"), Some(-42));

        p.set_bool("flags", true);
        assert_eq!(p.get_bool("flags"), Some(true));
        p.set_bool("flags", false);
        assert_eq!(p.get_bool("flags"), Some(false));
    }

    #[test]
    fn vector_round_trips() {
        let mut p = program();
        p.set_vec2("offset2", Vec2::new(1.5, -2.5));
        assert_eq!(p.get_vec2("offset2"), Some(Vec2::new(1.5, -2.5)));

        p.set_vec3("axis", Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(p.get_vec3("axis"), Some(Vec3::new(0.1, 0.2, 0.3)));

        p.set_vec4("tint", Vec4::new(1.0, 0.5, 0.25, 1.0));
        assert_eq!(p.get_vec4("tint"), Some(Vec4::new(1.0, 0.5, 0.25, 1.0)));
    }

    #[test]
    fn matrix_round_trips() {
        let mut p = program();

        let m2 = Mat2::from_cols_array(&[1.0, 2.0, 3.0, 4.0]);
        p.set_mat2("warp", m2);
        assert_eq!(p.get_mat2("warp"), Some(m2));

        let m3 = Mat3::from_cols_array(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        p.set_mat3("basis", m3);
        assert_eq!(p.get_mat3("basis"), Some(m3));

        let m4 = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        p.set_mat4("model", m4);
        assert_eq!(p.get_mat4("model"), Some(m4));
    }

    #[test]
    fn mat3_columns_do_not_clobber_neighbors() {
        let mut p = program();
        p.set_vec2("offset2", Vec2::new(9.0, 9.0));
        p.set_mat3("basis", Mat3::IDENTITY);
        // offset2 follows basis in the block; the padded column writes must
        // stay inside the mat3 slot
        assert_eq!(p.get_vec2("offset2"), Some(Vec2::new(9.0, 9.0)));
        assert_eq!(p.get_mat3("basis"), Some(Mat3::IDENTITY));
    }

    #[test]
    fn unknown_name_is_ignored() {
        let mut p = program();
        p.set_float("does_not_exist", 1.0);
        assert_eq!(p.get_float("does_not_exist"), None);
    }

    #[test]
    fn kind_mismatch_is_ignored() {
        let mut p = program();
        p.set_float("model", 1.0);
        // the mat4 slot is untouched (still zero-initialized)
        assert_eq!(p.get_mat4("model"), Some(Mat4::ZERO));
    }

    #[test]
    fn never_set_uniform_reads_zero() {
        let p = program();
        assert_eq!(p.get_float("mix_amount"), Some(0.0));
        assert_eq!(p.get_vec4("tint"), Some(Vec4::ZERO));
    }

    #[test]
    fn read_source_reports_missing_file() {
        let err = read_shader_source("/definitely/not/here.wgsl").unwrap_err();
        assert!(matches!(err, ShaderError::Io { .. }));
    }
}
