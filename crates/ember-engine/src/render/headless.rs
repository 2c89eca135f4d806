use std::collections::{BTreeMap, HashMap, HashSet};

use crate::coords::Color;
use crate::error::{GfxError, GfxResult, ShaderStage};

use super::handle::HandleAllocator;
use super::{
    DrawCall, FramebufferId, GeometryId, GraphicsContext, PassTarget, ShaderId, ShaderSource,
    TextureId, UniformValue, Vertex,
};

/// Draw captured by [`HeadlessContext`], with the shader's uniforms at draw time.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDraw {
    pub call: DrawCall,
    pub target: PassTarget,
    pub uniforms: BTreeMap<String, UniformValue>,
}

impl RecordedDraw {
    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.uniforms.get(name).copied()
    }
}

/// Command stream entry recorded by [`HeadlessContext`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    BeginPass {
        target: PassTarget,
        clear: Option<Color>,
    },
    Draw(RecordedDraw),
    EndPass,
}

#[derive(Debug)]
struct ShaderRecord {
    label: String,
    uniforms: BTreeMap<String, UniformValue>,
}

#[derive(Debug, Copy, Clone)]
struct FramebufferRecord {
    texture: TextureId,
    width: u32,
    height: u32,
}

/// Graphics context that allocates handles and records commands without a GPU.
///
/// Used by tests and tools to observe what the pipeline asks for: passes,
/// draws with their uniform snapshots, and resource lifetimes. Failures can
/// be injected per shader label or for all framebuffers.
#[derive(Debug, Default)]
pub struct HeadlessContext {
    handles: HandleAllocator,
    elapsed: f32,

    shaders: HashMap<ShaderId, ShaderRecord>,
    geometries: HashMap<GeometryId, usize>,
    textures: HashMap<TextureId, (u32, u32)>,
    framebuffers: HashMap<FramebufferId, FramebufferRecord>,

    open_pass: Option<PassTarget>,
    commands: Vec<Command>,

    failing_shaders: HashSet<String>,
    fail_framebuffers: bool,
}

impl HeadlessContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_elapsed(&mut self, seconds: f32) {
        self.elapsed = seconds;
    }

    /// Makes every later compile of a shader labelled `label` fail.
    pub fn fail_shader(&mut self, label: impl Into<String>) {
        self.failing_shaders.insert(label.into());
    }

    /// Makes later framebuffer allocations fail while `fail` is set.
    pub fn fail_framebuffers(&mut self, fail: bool) {
        self.fail_framebuffers = fail;
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    pub fn draws(&self) -> impl Iterator<Item = &RecordedDraw> {
        self.commands.iter().filter_map(|c| match c {
            Command::Draw(d) => Some(d),
            _ => None,
        })
    }

    pub fn draw_count(&self) -> usize {
        self.draws().count()
    }

    /// Draws recorded into `target`.
    pub fn draws_into(&self, target: PassTarget) -> impl Iterator<Item = &RecordedDraw> {
        self.draws().filter(move |d| d.target == target)
    }

    /// Current value of a shader uniform.
    pub fn uniform(&self, shader: ShaderId, name: &str) -> Option<UniformValue> {
        self.shaders.get(&shader)?.uniforms.get(name).copied()
    }

    pub fn shader_label(&self, shader: ShaderId) -> Option<&str> {
        self.shaders.get(&shader).map(|s| s.label.as_str())
    }

    pub fn live_shaders(&self) -> usize {
        self.shaders.len()
    }

    pub fn live_geometries(&self) -> usize {
        self.geometries.len()
    }

    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    pub fn live_framebuffers(&self) -> usize {
        self.framebuffers.len()
    }

    pub fn is_live_texture(&self, texture: TextureId) -> bool {
        self.textures.contains_key(&texture)
    }

    pub fn texture_size(&self, texture: TextureId) -> Option<(u32, u32)> {
        self.textures.get(&texture).copied()
    }
}

fn check_rgba(width: u32, height: u32, rgba: &[u8]) -> GfxResult<()> {
    let expected = width as usize * height as usize * 4;
    if width == 0 || height == 0 || rgba.len() != expected {
        return Err(GfxError::init(format!(
            "texture {width}x{height} expects {expected} bytes, got {}",
            rgba.len()
        )));
    }
    Ok(())
}

impl GraphicsContext for HeadlessContext {
    fn elapsed(&self) -> f32 {
        self.elapsed
    }

    fn compile_shader(&mut self, source: &ShaderSource) -> GfxResult<ShaderId> {
        let label = source.label.to_string();

        if !source.vertex.contains("fn vs_main") {
            return Err(GfxError::compile(label, ShaderStage::Vertex, "missing entry point `vs_main`"));
        }
        if !source.fragment.contains("fn fs_main") {
            return Err(GfxError::compile(label, ShaderStage::Fragment, "missing entry point `fs_main`"));
        }
        if self.failing_shaders.contains(&label) {
            return Err(GfxError::compile(label, ShaderStage::Fragment, "injected failure"));
        }

        let id = ShaderId::new(self.handles.next());
        log::debug!("headless: compiled {id} '{label}'");
        self.shaders.insert(
            id,
            ShaderRecord {
                label,
                uniforms: BTreeMap::new(),
            },
        );
        Ok(id)
    }

    fn destroy_shader(&mut self, shader: ShaderId) {
        self.shaders.remove(&shader);
    }

    fn create_geometry(&mut self, label: &str, vertices: &[Vertex]) -> GfxResult<GeometryId> {
        if vertices.is_empty() {
            return Err(GfxError::init(format!("geometry '{label}' has no vertices")));
        }
        let id = GeometryId::new(self.handles.next());
        self.geometries.insert(id, vertices.len());
        Ok(id)
    }

    fn destroy_geometry(&mut self, geometry: GeometryId) {
        self.geometries.remove(&geometry);
    }

    fn create_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> GfxResult<TextureId> {
        check_rgba(width, height, rgba)?;
        let id = TextureId::new(self.handles.next());
        self.textures.insert(id, (width, height));
        Ok(id)
    }

    fn update_texture(&mut self, texture: TextureId, width: u32, height: u32, rgba: &[u8]) -> GfxResult<()> {
        check_rgba(width, height, rgba)?;
        let size = self
            .textures
            .get_mut(&texture)
            .ok_or(GfxError::UnknownHandle(TextureId::KIND, texture.get()))?;
        *size = (width, height);
        Ok(())
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        self.textures.remove(&texture);
    }

    fn create_framebuffer(&mut self, width: u32, height: u32) -> GfxResult<FramebufferId> {
        if self.fail_framebuffers || width == 0 || height == 0 {
            return Err(GfxError::FramebufferIncomplete { width, height });
        }

        let texture = TextureId::new(self.handles.next());
        self.textures.insert(texture, (width, height));

        let id = FramebufferId::new(self.handles.next());
        self.framebuffers.insert(
            id,
            FramebufferRecord {
                texture,
                width,
                height,
            },
        );
        Ok(id)
    }

    fn destroy_framebuffer(&mut self, framebuffer: FramebufferId) {
        if let Some(fb) = self.framebuffers.remove(&framebuffer) {
            self.textures.remove(&fb.texture);
        }
    }

    fn framebuffer_texture(&self, framebuffer: FramebufferId) -> Option<TextureId> {
        self.framebuffers.get(&framebuffer).map(|fb| fb.texture)
    }

    fn framebuffer_size(&self, framebuffer: FramebufferId) -> Option<(u32, u32)> {
        self.framebuffers
            .get(&framebuffer)
            .map(|fb| (fb.width, fb.height))
    }

    fn set_uniform(&mut self, shader: ShaderId, name: &str, value: UniformValue) {
        match self.shaders.get_mut(&shader) {
            Some(record) => {
                record.uniforms.insert(name.to_string(), value);
            }
            None => log::warn!("headless: set_uniform '{name}' on unknown {shader}"),
        }
    }

    fn begin_pass(&mut self, target: PassTarget, clear: Option<Color>) {
        if self.open_pass.is_some() {
            log::warn!("headless: begin_pass while a pass is open; closing it");
            self.end_pass();
        }
        self.open_pass = Some(target);
        self.commands.push(Command::BeginPass { target, clear });
    }

    fn draw(&mut self, call: DrawCall) {
        let Some(target) = self.open_pass else {
            log::warn!("headless: draw outside of a pass ignored");
            return;
        };
        let Some(shader) = self.shaders.get(&call.shader) else {
            log::warn!("headless: draw with unknown {}", call.shader);
            return;
        };
        if !self.geometries.contains_key(&call.geometry) {
            log::warn!("headless: draw with unknown {}", call.geometry);
            return;
        }

        self.commands.push(Command::Draw(RecordedDraw {
            call,
            target,
            uniforms: shader.uniforms.clone(),
        }));
    }

    fn end_pass(&mut self) {
        if self.open_pass.take().is_some() {
            self.commands.push(Command::EndPass);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::builtin;

    #[test]
    fn framebuffer_owns_its_texture() {
        let mut ctx = HeadlessContext::new();
        let fb = ctx.create_framebuffer(64, 32).unwrap();
        let tex = ctx.framebuffer_texture(fb).unwrap();

        assert_eq!(ctx.framebuffer_size(fb), Some((64, 32)));
        assert!(ctx.is_live_texture(tex));

        ctx.destroy_framebuffer(fb);
        assert!(!ctx.is_live_texture(tex));
        assert_eq!(ctx.live_framebuffers(), 0);
    }

    #[test]
    fn zero_sized_framebuffer_is_incomplete() {
        let mut ctx = HeadlessContext::new();
        let err = ctx.create_framebuffer(0, 10).unwrap_err();
        assert_eq!(err.code(), 0x41);
    }

    #[test]
    fn injected_shader_failure() {
        let mut ctx = HeadlessContext::new();
        ctx.fail_shader("ember crt");
        let err = ctx.compile_shader(&builtin::crt()).unwrap_err();
        assert_eq!(err.code(), 0x32);
        assert!(ctx.compile_shader(&builtin::blit()).is_ok());
    }

    #[test]
    fn missing_entry_point_fails_compile() {
        let mut ctx = HeadlessContext::new();
        let src = ShaderSource::new("broken", builtin::FULLSCREEN_VERTEX, "fn main() {}");
        let err = ctx.compile_shader(&src).unwrap_err();
        assert!(matches!(err, GfxError::ShaderCompile { stage: ShaderStage::Fragment, .. }));
    }

    #[test]
    fn draws_snapshot_uniforms_and_target() {
        let mut ctx = HeadlessContext::new();
        let shader = ctx.compile_shader(&builtin::blit()).unwrap();
        let quad = ctx.create_geometry("quad", &builtin::fullscreen_quad()).unwrap();
        let fb = ctx.create_framebuffer(8, 8).unwrap();

        ctx.set_uniform(shader, "time", UniformValue::F32(1.0));
        ctx.begin_pass(PassTarget::Framebuffer(fb), Some(Color::TRANSPARENT));
        ctx.draw(DrawCall { shader, geometry: quad, texture: None });
        ctx.set_uniform(shader, "time", UniformValue::F32(2.0));
        ctx.draw(DrawCall { shader, geometry: quad, texture: None });
        ctx.end_pass();

        let times: Vec<_> = ctx.draws().map(|d| d.uniform("time")).collect();
        assert_eq!(times, vec![Some(UniformValue::F32(1.0)), Some(UniformValue::F32(2.0))]);
        assert_eq!(ctx.draws_into(PassTarget::Framebuffer(fb)).count(), 2);
        assert_eq!(ctx.commands().last(), Some(&Command::EndPass));
    }

    #[test]
    fn draw_outside_pass_is_dropped() {
        let mut ctx = HeadlessContext::new();
        let shader = ctx.compile_shader(&builtin::blit()).unwrap();
        let quad = ctx.create_geometry("quad", &builtin::fullscreen_quad()).unwrap();
        ctx.draw(DrawCall { shader, geometry: quad, texture: None });
        assert_eq!(ctx.draw_count(), 0);
    }

    #[test]
    fn texture_upload_validates_length() {
        let mut ctx = HeadlessContext::new();
        assert!(ctx.create_texture(2, 2, &[0; 16]).is_ok());
        assert!(ctx.create_texture(2, 2, &[0; 15]).is_err());
    }
}
