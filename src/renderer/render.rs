use nalgebra_glm as glm;

use crate::renderer::renderer::{Renderer, SceneUniform};
use crate::scene::Scene;

const LIGHT_POSITION_WORLD: [f32; 3] = [4.0, 4.0, 4.0];

impl Renderer {
    /// Draws one frame: uploads the frame's matrices, clears color and
    /// depth, then submits either the full hierarchy or a single mesh
    /// when one is pinned.
    pub fn render(
        &mut self,
        scene: Option<&Scene>,
        pinned_mesh: Option<usize>,
        view: &glm::Mat4,
        projection: &glm::Mat4,
    ) -> Result<(), wgpu::SurfaceError> {
        // Minimized windows configure a zero-sized surface.
        if self.config.width == 0 || self.config.height == 0 {
            return Ok(());
        }

        let model: glm::Mat4 = glm::Mat4::identity();
        let uniform = SceneUniform {
            mvp: (projection * view * model).into(),
            view: (*view).into(),
            model: model.into(),
            light_position_world: LIGHT_POSITION_WORLD,
            _padding: 0.0,
        };
        self.queue.write_buffer(
            &self.scene_uniform_buffer,
            0,
            bytemuck::cast_slice(&[uniform]),
        );

        let output = self.surface.get_current_texture()?;
        let surface_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let depth_texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: self.config.width,
                height: self.config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: self.clear_color[0] as f64,
                            g: self.clear_color[1] as f64,
                            b: self.clear_color[2] as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(scene) = scene {
                render_pass.set_pipeline(&self.render_pipeline);
                render_pass.set_bind_group(0, &self.scene_bind_group, &[]);
                render_pass.set_bind_group(1, &self.texture_bind_group, &[]);

                match pinned_mesh {
                    Some(index) => scene.draw_mesh(&mut render_pass, index),
                    None => scene.draw(&mut render_pass),
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
