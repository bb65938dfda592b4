// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained scenes: shapes paired with fillers and processors, rendered
//! in painter's order.

use crate::filler::{Filler, Solid};
use crate::pixmap::Pixmap;
use crate::render::{render_shape, CompositeMode, RenderSettings};
use peniko::color::{AlphaColor, Srgb};
use scrawl_path::proc::PathProcessor;
use scrawl_path::{Affine, Rect, Shape};
use std::sync::Arc;

/// A processor and filler applied together when drawing a shape's
/// outline rather than its area.
pub struct Pen {
    /// Turns each input path into the paths actually filled, e.g. a
    /// stroke expansion or a dash pattern feeding a stroker.
    pub processor: Arc<dyn PathProcessor + Send + Sync>,
    /// The pixel source for the processed geometry.
    pub filler: Arc<dyn Filler + Send + Sync>,
    /// Extra transform applied after processing, composed with the
    /// scene transform.
    pub transform: Option<Affine>,
}

enum Directive {
    Fill {
        shape: Shape,
        filler: Arc<dyn Filler + Send + Sync>,
    },
    Stroke {
        shape: Shape,
        pen: Pen,
    },
    Group {
        scene: Renderable,
        transform: Option<Affine>,
    },
}

/// An ordered list of draw directives forming a scene.
///
/// Directives render back to front in insertion order; groups nest whole
/// scenes under an extra transform.
#[derive(Default)]
pub struct Renderable {
    directives: Vec<Directive>,
}

impl Renderable {
    /// An empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a shape filled with a solid color.
    pub fn push_fill(&mut self, shape: Shape, color: AlphaColor<Srgb>) {
        self.push_filled(shape, Arc::new(Solid::new(color)));
    }

    /// Append a shape filled through an arbitrary filler.
    pub fn push_filled(&mut self, shape: Shape, filler: Arc<dyn Filler + Send + Sync>) {
        self.directives.push(Directive::Fill { shape, filler });
    }

    /// Append a shape drawn through a pen.
    pub fn push_stroke(&mut self, shape: Shape, pen: Pen) {
        self.directives.push(Directive::Stroke { shape, pen });
    }

    /// Append a nested scene, optionally under its own transform.
    pub fn push_group(&mut self, scene: Renderable, transform: Option<Affine>) {
        self.directives.push(Directive::Group { scene, transform });
    }

    /// Whether the scene has no directives.
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Render the scene into `target` under `transform`.
    pub fn render(&self, target: &mut Pixmap, transform: &Affine, settings: &RenderSettings) {
        for directive in &self.directives {
            match directive {
                Directive::Fill { shape, filler } => {
                    let shape = shape.transform(transform);
                    render_shape(
                        target,
                        None,
                        &shape,
                        filler.as_ref(),
                        None,
                        CompositeMode::SrcOver,
                        settings,
                    );
                }
                Directive::Stroke { shape, pen } => {
                    let drawn = shape.process(pen.processor.as_ref());
                    let combined = match &pen.transform {
                        Some(local) => *transform * *local,
                        None => *transform,
                    };
                    let drawn = drawn.transform(&combined);
                    render_shape(
                        target,
                        None,
                        &drawn,
                        pen.filler.as_ref(),
                        None,
                        CompositeMode::SrcOver,
                        settings,
                    );
                }
                Directive::Group { scene, transform: local } => {
                    let combined = match local {
                        Some(local) => *transform * *local,
                        None => *transform,
                    };
                    scene.render(target, &combined, settings);
                }
            }
        }
    }

    /// The union of all directive bounds in scene coordinates.
    ///
    /// Stroke directives are measured after processing, so a wide stroke
    /// reports its full extent.
    pub fn bounds(&self) -> Rect {
        let mut acc = Rect::EMPTY;
        for directive in &self.directives {
            let b = match directive {
                Directive::Fill { shape, .. } => shape.bounds(),
                Directive::Stroke { shape, pen } => {
                    let drawn = shape.process(pen.processor.as_ref());
                    match &pen.transform {
                        Some(local) => drawn.transform(local).bounds(),
                        None => drawn.bounds(),
                    }
                }
                Directive::Group { scene, transform } => {
                    let b = scene.bounds();
                    match transform {
                        Some(t) => Rect::from_points(
                            [
                                t.apply(&scrawl_path::Point::new(b.x0, b.y0)),
                                t.apply(&scrawl_path::Point::new(b.x1, b.y0)),
                                t.apply(&scrawl_path::Point::new(b.x1, b.y1)),
                                t.apply(&scrawl_path::Point::new(b.x0, b.y1)),
                            ]
                            .iter(),
                        ),
                        None => b,
                    }
                }
            };
            acc = acc.union(&b);
        }
        acc
    }
}
