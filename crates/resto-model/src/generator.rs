//! `ArrivalGenerator`: Poisson arrivals for one channel.

use resto_core::{Sampler, SizeRange};
use resto_des::{Context, DesResult, Process, Yield};

use crate::{Channel, Lifecycle, Restaurant};

/// Creates one entity per exponential interarrival gap, forever.
///
/// The first resume only schedules the first gap, so nobody arrives at
/// t = 0.  The generator never exits on its own; the runner stops it at the
/// horizon.  A mean of `+∞` disables the channel.
pub struct ArrivalGenerator {
    channel:           Channel,
    mean_interarrival: f64,
    sizes:             SizeRange,
    primed:            bool,
    generated:         u64,
}

impl ArrivalGenerator {
    pub fn new(channel: Channel, mean_interarrival: f64, sizes: SizeRange) -> Self {
        Self { channel, mean_interarrival, sizes, primed: false, generated: 0 }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Entities created so far.
    pub fn generated(&self) -> u64 {
        self.generated
    }
}

impl<S: Sampler> Process<Restaurant<S>> for ArrivalGenerator {
    fn resume(&mut self, cx: &mut Context<'_, Restaurant<S>>) -> DesResult<Yield> {
        if self.primed {
            let now = cx.now();
            let size = self.sizes.sample(&mut cx.world.sampler);
            let id = cx.world.admit(self.channel, size, now);
            let lifecycle = Lifecycle::new(cx.world.roster.get(id)?);
            cx.spawn(lifecycle);
            self.generated += 1;
        }
        self.primed = true;
        Ok(Yield::Timeout(cx.world.sampler.exponential(self.mean_interarrival)))
    }

    fn name(&self) -> &'static str {
        "generator"
    }
}
