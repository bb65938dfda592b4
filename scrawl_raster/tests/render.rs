// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end fills through the public API.

use scrawl_path::builder;
use scrawl_path::proc::StrokeProc;
use scrawl_path::{Point, Rect, Shape};
use scrawl_raster::peniko::color::AlphaColor;
use scrawl_raster::{
    render_shape, CompositeMode, LinearGradient, Pen, Pixmap, Renderable, RenderSettings, Solid,
};
use std::sync::Arc;

fn white_canvas(size: u16) -> Pixmap {
    let mut target = Pixmap::new(size, size);
    target.fill(AlphaColor::from_rgba8(255, 255, 255, 255));
    target
}

#[test]
fn red_circle_on_white() {
    let mut target = white_canvas(100);
    let circle = builder::circle(&Point::new(50.0, 50.0), 10.0).unwrap();
    let red = Solid::new(AlphaColor::from_rgba8(255, 0, 0, 255));
    render_shape(
        &mut target,
        None,
        &Shape::from_path(circle),
        &red,
        None,
        CompositeMode::SrcOver,
        &RenderSettings::default(),
    );
    let center = target.sample(50, 50);
    assert!(center.r >= 254);
    assert!(center.g <= 1 && center.b <= 1);
    let corner = target.sample(0, 0);
    assert_eq!((corner.r, corner.g, corner.b), (255, 255, 255));
    // The rim antialiases between red and white.
    let rim = target.sample(50, 40);
    assert!(rim.g < 255);
}

#[test]
fn clip_limits_the_fill() {
    let mut target = white_canvas(40);
    let circle = builder::circle(&Point::new(20.0, 20.0), 15.0).unwrap();
    let blue = Solid::new(AlphaColor::from_rgba8(0, 0, 255, 255));
    render_shape(
        &mut target,
        Some(&Rect::new(0.0, 0.0, 20.0, 40.0)),
        &Shape::from_path(circle),
        &blue,
        None,
        CompositeMode::SrcOver,
        &RenderSettings::default(),
    );
    assert_eq!(target.sample(15, 20).b, 255);
    assert_eq!(target.sample(25, 20).r, 255);
    assert_eq!(target.sample(25, 20).g, 255);
}

#[test]
fn stroked_scene_renders_an_outline() {
    let mut target = Pixmap::new(40, 40);
    let square = builder::polygon([
        Point::new(10.0, 10.0),
        Point::new(30.0, 10.0),
        Point::new(30.0, 30.0),
        Point::new(10.0, 30.0),
    ])
    .unwrap();
    let mut scene = Renderable::new();
    scene.push_stroke(
        Shape::from_path(square),
        Pen {
            processor: Arc::new(StrokeProc::new(4.0)),
            filler: Arc::new(Solid::new(AlphaColor::from_rgba8(0, 0, 0, 255))),
            transform: None,
        },
    );
    scene.render(
        &mut target,
        &scrawl_path::Affine::IDENTITY,
        &RenderSettings::default(),
    );
    // On the stroked edge.
    assert_eq!(target.sample(20, 10).a, 255);
    // The square's interior stays empty.
    assert_eq!(target.sample(20, 20).a, 0);
}

#[test]
fn gradient_fill_shades_across_the_shape() {
    let mut target = Pixmap::new(60, 20);
    let band = builder::polygon([
        Point::new(0.0, 0.0),
        Point::new(60.0, 0.0),
        Point::new(60.0, 20.0),
        Point::new(0.0, 20.0),
    ])
    .unwrap();
    let gradient = LinearGradient::new(
        Point::new(0.0, 0.0),
        Point::new(60.0, 0.0),
        vec![
            (0.0, AlphaColor::from_rgba8(0, 0, 0, 255)),
            (1.0, AlphaColor::from_rgba8(255, 255, 255, 255)),
        ],
    );
    render_shape(
        &mut target,
        None,
        &Shape::from_path(band),
        &gradient,
        None,
        CompositeMode::SrcOver,
        &RenderSettings::default(),
    );
    let left = target.sample(5, 10).r;
    let mid = target.sample(30, 10).r;
    let right = target.sample(55, 10).r;
    assert!(left < mid && mid < right);
}
