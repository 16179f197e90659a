use evo_types::{Genome, GENOME_LEN};
use rand::Rng;

const CROSSOVER_PARENT_ONE_PROBABILITY: f32 = 0.5;
/// Floor on the mutation step so genes near zero can still move.
const MUTATION_STEP_FLOOR: f32 = 0.1;

pub(crate) fn generate_seed_genome<R: Rng + ?Sized>(scale: f32, rng: &mut R) -> Genome {
    Genome(
        (0..GENOME_LEN)
            .map(|_| (rng.random::<f32>() * 2.0 - 1.0) * scale)
            .collect(),
    )
}

/// Uniform crossover: one draw per gene picks which parent it comes from.
pub(crate) fn crossover<R: Rng + ?Sized>(a: &Genome, b: &Genome, rng: &mut R) -> Genome {
    Genome(
        a.genes()
            .iter()
            .zip(b.genes())
            .map(|(&ga, &gb)| {
                if rng.random::<f32>() < CROSSOVER_PARENT_ONE_PROBABILITY {
                    ga
                } else {
                    gb
                }
            })
            .collect(),
    )
}

/// Perturbs each gene with probability `rate`. The step is proportional to
/// the gene's magnitude, so large weights explore further.
pub(crate) fn mutate_genome<R: Rng + ?Sized>(
    genome: &mut Genome,
    rate: f32,
    power: f32,
    rng: &mut R,
) {
    for gene in &mut genome.0 {
        if rng.random::<f32>() < rate {
            let unit = rng.random::<f32>() * 2.0 - 1.0;
            *gene += unit * power * (MUTATION_STEP_FLOOR + gene.abs());
        }
    }
}
