//! Interactive chart: a controller bound to a surface that is redrawn
//! whenever the visible distribution changes.

use tracing::debug;

use crate::{
    chart::{render, ChartTheme, DrawOutcome},
    controller::{Param, ParameterController},
    distribution::{DistributionSpec, Family},
    surface::DrawSurface,
};

pub struct Explorer<S> {
    controller: ParameterController,
    surface: S,
    theme: ChartTheme,
    padding: f64,
    drawn_revision: u64,
    drawn_spec: DistributionSpec,
    outcome: DrawOutcome,
}

impl<S: DrawSurface> Explorer<S> {
    /// Takes ownership of `surface` and draws the active family once.
    pub fn new(
        controller: ParameterController,
        surface: S,
        theme: ChartTheme,
        padding: f64,
    ) -> Self {
        let drawn_spec = controller.spec();
        let mut explorer = Self {
            drawn_revision: controller.revision(),
            controller,
            surface,
            theme,
            padding,
            drawn_spec,
            outcome: DrawOutcome::Degenerate,
        };
        explorer.redraw();
        explorer
    }

    pub fn controller(&self) -> &ParameterController {
        &self.controller
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Outcome of the last draw.
    pub fn outcome(&self) -> DrawOutcome {
        self.outcome
    }

    /// Switch tabs. Returns whether the chart was redrawn.
    pub fn set_active(&mut self, family: Family) -> bool {
        self.controller.set_active(family);
        self.refresh()
    }

    /// Slider input. Returns the stored value.
    pub fn set_param(&mut self, param: Param, value: f64) -> f64 {
        let applied = self.controller.set_param(param, value);
        self.refresh();
        applied
    }

    /// Redraw if the active spec moved since the last draw.
    fn refresh(&mut self) -> bool {
        if self.controller.revision() == self.drawn_revision {
            return false;
        }
        self.drawn_revision = self.controller.revision();
        if self.controller.spec() == self.drawn_spec {
            // only an inactive family changed
            return false;
        }
        self.redraw();
        true
    }

    fn redraw(&mut self) {
        let spec = self.controller.spec();
        self.outcome = render(&mut self.surface, &spec, self.padding, &self.theme);
        debug!(spec = ?spec, revision = self.drawn_revision, "chart redrawn");
        self.drawn_spec = spec;
    }
}
