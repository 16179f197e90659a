use crate::SimError;
use evo_types::{
    ControllerState, Genome, GATE_BLOCK_LEN, GENOME_LEN, HIDDEN_SIZE, INPUT_SIZE, OUTPUT_HEAD_LEN,
    OUTPUT_SIZE,
};

const INPUT_WEIGHT_LEN: usize = INPUT_SIZE * HIDDEN_SIZE;
const RECURRENT_WEIGHT_LEN: usize = HIDDEN_SIZE * HIDDEN_SIZE;
const HEAD_WEIGHT_LEN: usize = HIDDEN_SIZE * OUTPUT_SIZE;

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// One gate's parameters. Weight matrices are column-major in the hidden
/// unit: the weight from input `i` to unit `h` lives at `i * HIDDEN_SIZE + h`.
#[derive(Debug, Clone, Copy)]
pub struct GateBlock<'a> {
    pub input_weights: &'a [f32],
    pub recurrent_weights: &'a [f32],
    pub biases: &'a [f32],
}

impl<'a> GateBlock<'a> {
    fn split(block: &'a [f32]) -> Self {
        let (input_weights, rest) = block.split_at(INPUT_WEIGHT_LEN);
        let (recurrent_weights, biases) = rest.split_at(RECURRENT_WEIGHT_LEN);
        Self {
            input_weights,
            recurrent_weights,
            biases,
        }
    }

    fn pre_activations(
        &self,
        inputs: &[f32; INPUT_SIZE],
        hidden: &[f32; HIDDEN_SIZE],
    ) -> [f32; HIDDEN_SIZE] {
        let mut out = [0.0; HIDDEN_SIZE];
        for (h, slot) in out.iter_mut().enumerate() {
            let mut sum = 0.0;
            for (i, input) in inputs.iter().enumerate() {
                sum += input * self.input_weights[i * HIDDEN_SIZE + h];
            }
            for (hh, prev) in hidden.iter().enumerate() {
                sum += prev * self.recurrent_weights[hh * HIDDEN_SIZE + h];
            }
            *slot = sum + self.biases[h];
        }
        out
    }
}

/// Final projection from hidden state to motor outputs. Row-major in the
/// output: the weight from unit `hh` to output `o` lives at `o * HIDDEN_SIZE + hh`.
#[derive(Debug, Clone, Copy)]
pub struct OutputHead<'a> {
    pub weights: &'a [f32],
    pub biases: &'a [f32],
}

#[derive(Debug, Clone, Copy)]
pub struct GenomeLayout<'a> {
    pub input_gate: GateBlock<'a>,
    pub forget_gate: GateBlock<'a>,
    pub candidate: GateBlock<'a>,
    pub output_gate: GateBlock<'a>,
    pub head: OutputHead<'a>,
}

impl<'a> GenomeLayout<'a> {
    pub fn decode(genes: &'a [f32]) -> Result<Self, SimError> {
        if genes.len() != GENOME_LEN {
            return Err(SimError::GenomeLength {
                expected: GENOME_LEN,
                actual: genes.len(),
            });
        }

        let (input_gate, rest) = genes.split_at(GATE_BLOCK_LEN);
        let (forget_gate, rest) = rest.split_at(GATE_BLOCK_LEN);
        let (candidate, rest) = rest.split_at(GATE_BLOCK_LEN);
        let (output_gate, head) = rest.split_at(GATE_BLOCK_LEN);
        debug_assert_eq!(head.len(), OUTPUT_HEAD_LEN);
        let (head_weights, head_biases) = head.split_at(HEAD_WEIGHT_LEN);

        Ok(Self {
            input_gate: GateBlock::split(input_gate),
            forget_gate: GateBlock::split(forget_gate),
            candidate: GateBlock::split(candidate),
            output_gate: GateBlock::split(output_gate),
            head: OutputHead {
                weights: head_weights,
                biases: head_biases,
            },
        })
    }
}

/// Runs one recurrent step. The caller's state is left untouched; the next
/// state is returned alongside the motor outputs, each in (-1, 1).
pub fn step_controller(
    genome: &Genome,
    inputs: &[f32; INPUT_SIZE],
    state: &ControllerState,
) -> Result<([f32; OUTPUT_SIZE], ControllerState), SimError> {
    let layout = GenomeLayout::decode(genome.genes())?;

    let input_gate = layout.input_gate.pre_activations(inputs, &state.hidden);
    let forget_gate = layout.forget_gate.pre_activations(inputs, &state.hidden);
    let candidate = layout.candidate.pre_activations(inputs, &state.hidden);
    let output_gate = layout.output_gate.pre_activations(inputs, &state.hidden);

    let mut next = ControllerState::default();
    for h in 0..HIDDEN_SIZE {
        let i = sigmoid(input_gate[h]);
        let f = sigmoid(forget_gate[h]);
        let g = candidate[h].tanh();
        let o = sigmoid(output_gate[h]);
        next.cell[h] = f * state.cell[h] + i * g;
        next.hidden[h] = o * next.cell[h].tanh();
    }

    let mut outputs = [0.0; OUTPUT_SIZE];
    for (o, slot) in outputs.iter_mut().enumerate() {
        let row = &layout.head.weights[o * HIDDEN_SIZE..(o + 1) * HIDDEN_SIZE];
        let sum = row
            .iter()
            .zip(next.hidden.iter())
            .fold(layout.head.biases[o], |acc, (w, h)| acc + w * h);
        *slot = sum.tanh();
    }

    Ok((outputs, next))
}
