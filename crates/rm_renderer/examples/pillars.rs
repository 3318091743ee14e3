//! Pillar scene example.
//!
//! Builds a colonnade of pillars topped with mirror spheres, two tori and
//! a CSG centrepiece, renders one frame and saves it as PNG.

use anyhow::Result;
use rm_core::{Color, Material, Scene};
use rm_math::Vec3;
use rm_renderer::{Camera, RenderSettings, Renderer};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let start = std::time::Instant::now();
    let scene = build_scene()?;
    log::info!(
        "Scene built in {:?}: {} roots, {} nodes",
        start.elapsed(),
        scene.roots().len(),
        scene.nodes().len()
    );

    let settings = RenderSettings {
        width: 1280,
        height: 720,
        exposure: 1.8,
        samples_per_pixel: 4,
        ..Default::default()
    };
    let aspect = settings.width as f32 / settings.height as f32;
    let mut renderer = Renderer::with_settings(settings)?;

    // Darker sky and ground to let the lights carry the scene
    renderer.set_sky_colors(Color::new(0.2, 0.2, 0.3), Color::new(0.05, 0.1, 0.2));
    renderer.set_ground_colors(Color::new(0.2, 0.2, 0.15), Color::new(0.05, 0.05, 0.02));

    let camera = Camera::look_at(Vec3::new(0.0, 3.5, 15.0), Vec3::new(0.0, 0.5, 0.0), 45.0, aspect);

    let image = renderer.render(&scene, &camera);

    let filename = "pillars.png";
    image.to_rgb_image().save(filename)?;
    log::info!("Saved to {}", filename);

    Ok(())
}

fn build_scene() -> Result<Scene> {
    let mut scene = Scene::new();
    let nodes = scene.nodes_mut();
    let mut roots = Vec::new();

    // Ground at y = -1
    let ground = nodes.plane(Vec3::Y, 1.0);
    nodes.set_material(ground, Material::new(Color::splat(0.4)).with_metal(0.1, 0.9))?;
    roots.push(ground);

    // A row of pillars, each with a mirror sphere on top
    for i in (-4..=4).step_by(2) {
        let x = i as f32;
        let pillar = nodes.cylinder(Vec3::new(x, 0.0, -5.0), 0.5, 3.0);
        nodes.set_material(pillar, Material::new(Color::splat(0.7)).with_metal(0.2, 0.5))?;
        roots.push(pillar);

        let albedo = if i % 4 == 0 {
            Color::new(0.9, 0.2, 0.2)
        } else {
            Color::new(0.2, 0.2, 0.9)
        };
        let sphere = nodes.sphere(Vec3::new(x, 2.0, -5.0), 0.6);
        nodes.set_material(sphere, Material::new(albedo).with_metal(0.9, 0.05).with_emissive(0.1))?;
        roots.push(sphere);
    }

    let torus = nodes.torus(Vec3::new(-3.0, 0.5, 0.0), 1.0, 0.25);
    nodes.set_material(torus, Material::new(Color::new(0.9, 0.5, 0.2)).with_metal(0.7, 0.1))?;
    roots.push(torus);

    let torus = nodes.torus(Vec3::new(3.0, 0.5, 0.0), 1.0, 0.25);
    nodes.set_material(torus, Material::new(Color::new(0.2, 0.9, 0.5)).with_metal(0.7, 0.1))?;
    roots.push(torus);

    // Rounded cube: box intersected with a sphere
    let block = nodes.cuboid(Vec3::new(0.0, 1.0, 0.0), Vec3::splat(2.0));
    nodes.set_material(block, Material::new(Color::splat(0.3)).with_metal(0.8, 0.05))?;
    let core = nodes.sphere(Vec3::new(0.0, 1.0, 0.0), 1.4);
    nodes.set_material(
        core,
        Material::new(Color::new(0.95, 0.9, 0.1)).with_metal(0.9, 0.05).with_emissive(0.15),
    )?;
    roots.push(nodes.intersection(block, core)?);

    // A field of small spheres far behind the colonnade
    let pebble = nodes.sphere(Vec3::ZERO, 0.3);
    nodes.set_material(pebble, Material::new(Color::new(0.5, 0.6, 0.7)))?;
    let field = nodes.repetition(pebble, Vec3::new(3.0, 0.0, 3.0))?;
    let backdrop = nodes.cuboid(Vec3::new(0.0, -0.7, -30.0), Vec3::new(60.0, 0.6, 30.0));
    roots.push(nodes.intersection(field, backdrop)?);

    for root in roots {
        scene.add(root)?;
    }

    // Very dim bluish ambient
    scene.set_ambient_light(Color::new(0.02, 0.02, 0.04));

    // Warm key, cold rim, red accent from behind
    scene.add_light(Vec3::new(15.0, 12.0, 10.0), Color::new(1.0, 0.85, 0.7), 1.8);
    scene.add_light(Vec3::new(-12.0, 8.0, 5.0), Color::new(0.4, 0.4, 1.0), 1.0);
    scene.add_light(Vec3::new(0.0, 3.0, -15.0), Color::new(0.9, 0.2, 0.2), 0.8);

    Ok(scene)
}
