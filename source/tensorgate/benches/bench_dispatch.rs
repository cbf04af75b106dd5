// Copyright 2023 Vivek Panyam
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! This benchmark measures dispatch overhead with an echo model (which
//! should be ~the cost of resolve + decode + encode)

use async_trait::async_trait;
use criterion::{criterion_group, criterion_main, Criterion};
use tensorgate::dispatch::{DecodedInputs, DecodedOutputs};
use tensorgate::metadata::ModelMetadata;
use tensorgate::types::{DataType, InferenceRequest, TensorData, WireTensor};
use tensorgate::{InferenceDispatcher, Model};

struct EchoModel {
    metadata: ModelMetadata,
}

#[async_trait]
impl Model for EchoModel {
    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    async fn predict(&self, inputs: DecodedInputs) -> Result<DecodedOutputs, String> {
        match inputs {
            DecodedInputs::PerInput(values) => Ok(DecodedOutputs::Named(values)),
            DecodedInputs::RequestWide(value) => Ok(DecodedOutputs::Composite(value)),
        }
    }
}

fn dispatch_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();

    let dispatcher = InferenceDispatcher::with_global_registry();
    let model = EchoModel {
        metadata: ModelMetadata::named("echo"),
    };

    let request = InferenceRequest {
        id: None,
        inputs: vec![WireTensor::new(
            "x",
            DataType::Float,
            vec![1024],
            TensorData::Float(vec![0.0; 1024]),
        )],
        parameters: None,
    };

    c.bench_function("dispatch_echo_fp32_1024", |b| {
        b.to_async(&runtime)
            .iter(|| async { dispatcher.dispatch(&request, &model).await.unwrap() })
    });
}

criterion_group!(benches, dispatch_benchmark);
criterion_main!(benches);
