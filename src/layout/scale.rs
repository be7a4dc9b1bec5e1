use crate::foundation::error::{PressError, PressResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
/// Canvas size plus the reference ("small") design size that layer geometry is authored in.
pub struct ScaleInput {
    /// Output canvas width in pixels.
    pub cwidth: u32,
    /// Output canvas height in pixels.
    pub cheight: u32,
    /// Reference design width.
    pub small_w: u32,
    /// Reference design height.
    pub small_h: u32,
}

impl ScaleInput {
    /// Reject zero dimensions; every ratio below divides by one of them.
    pub fn validate(&self) -> PressResult<()> {
        for (name, v) in [
            ("cwidth", self.cwidth),
            ("cheight", self.cheight),
            ("small_w", self.small_w),
            ("small_h", self.small_h),
        ] {
            if v == 0 {
                return Err(PressError::config(format!("{name} must be > 0")));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
/// Uniform pixel ratio plus landscape correction factors, computed once per run.
///
/// On landscape canvases (`cwidth / cheight > 1`) the ratio follows the height and
/// `landw_scale` carries the extra horizontal stretch; everywhere else both factors are `1`.
pub struct ScaleContext {
    /// Design units to device pixels.
    pub ratio: f64,
    /// Extra multiplier applied to horizontal positions.
    pub landw_scale: f64,
    /// Extra multiplier applied to vertical positions.
    pub landh_scale: f64,
}

impl ScaleContext {
    /// Derive the scale context for `input`.
    pub fn from_input(input: &ScaleInput) -> PressResult<Self> {
        input.validate()?;

        let cwidth = f64::from(input.cwidth);
        let cheight = f64::from(input.cheight);
        let small_w = f64::from(input.small_w);
        let small_h = f64::from(input.small_h);

        let ctx = if cwidth / cheight > 1.0 {
            let ratio = cheight / small_h;
            Self {
                ratio,
                landw_scale: (cwidth / small_w) / ratio,
                landh_scale: ratio / (cheight / small_h),
            }
        } else {
            Self {
                ratio: cwidth / small_w,
                landw_scale: 1.0,
                landh_scale: 1.0,
            }
        };
        tracing::debug!(
            ratio = ctx.ratio,
            landw_scale = ctx.landw_scale,
            landh_scale = ctx.landh_scale,
            "scale context"
        );
        Ok(ctx)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/scale.rs"]
mod tests;
