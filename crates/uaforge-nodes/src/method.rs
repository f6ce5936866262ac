// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Method creation and wiring.
//!
//! A method is built in up to four phases, each after the previous one
//! succeeded:
//!
//! ```text
//! Node ──► InputArguments ──► OutputArguments ──► Callback
//!          (if inputs)        (if outputs)
//! ```
//!
//! A failure after `Node` leaves the method in the address space and
//! reports [`MethodWiringError`] with the phases that completed.

use std::fmt;
use std::sync::Arc;

use crate::error::{MethodWiringError, NodesError, NodesResult};
use crate::factory::{NodeFactory, VariableOptions};
use crate::identity::Identity;
use crate::ids;
use crate::node::Node;
use crate::request::AddNodesItem;
use crate::status::StatusCode;
use crate::types::{NodeId, QualifiedName};
use crate::variant::{Argument, ExtensionObject, TypedValue, Value, VariantType};

// =============================================================================
// MethodCallback
// =============================================================================

/// Handler run when a method is called.
///
/// Receives the object the method was called on and the input arguments;
/// returns the output arguments or a bad status.
pub trait MethodCallback: Send + Sync {
    /// Executes the method.
    fn call(&self, parent: &NodeId, arguments: Vec<TypedValue>) -> Result<Vec<TypedValue>, StatusCode>;
}

impl<F> MethodCallback for F
where
    F: Fn(&NodeId, Vec<TypedValue>) -> Result<Vec<TypedValue>, StatusCode> + Send + Sync,
{
    fn call(&self, parent: &NodeId, arguments: Vec<TypedValue>) -> Result<Vec<TypedValue>, StatusCode> {
        self(parent, arguments)
    }
}

// =============================================================================
// Options
// =============================================================================

/// One argument of a method signature.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentSpec {
    /// A complete argument description.
    Descriptor(Argument),
    /// Only a type; the argument gets an empty name and a scalar rank.
    Type(VariantType),
}

impl From<Argument> for ArgumentSpec {
    fn from(argument: Argument) -> Self {
        Self::Descriptor(argument)
    }
}

impl From<VariantType> for ArgumentSpec {
    fn from(tag: VariantType) -> Self {
        Self::Type(tag)
    }
}

/// Options for [`NodeFactory::create_method`].
#[derive(Clone)]
pub struct MethodOptions {
    /// Handler for calls.
    pub callback: Arc<dyn MethodCallback>,
    /// Input arguments; no InputArguments property when empty.
    pub inputs: Vec<ArgumentSpec>,
    /// Output arguments; no OutputArguments property when empty.
    pub outputs: Vec<ArgumentSpec>,
}

impl MethodOptions {
    /// A method without arguments.
    pub fn new(callback: impl MethodCallback + 'static) -> Self {
        Self {
            callback: Arc::new(callback),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Sets the input arguments.
    pub fn inputs<I, A>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<ArgumentSpec>,
    {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the output arguments.
    pub fn outputs<I, A>(mut self, outputs: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<ArgumentSpec>,
    {
        self.outputs = outputs.into_iter().map(Into::into).collect();
        self
    }
}

impl fmt::Debug for MethodOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodOptions")
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Result types
// =============================================================================

/// Wiring phases of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodPhase {
    /// The Method node itself.
    Node,
    /// The InputArguments property.
    InputArguments,
    /// The OutputArguments property.
    OutputArguments,
    /// Callback registration.
    Callback,
}

impl fmt::Display for MethodPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Node => "method node creation",
            Self::InputArguments => "InputArguments property creation",
            Self::OutputArguments => "OutputArguments property creation",
            Self::Callback => "callback registration",
        })
    }
}

/// A fully wired method.
#[derive(Debug, Clone)]
pub struct MethodNode {
    /// The Method node.
    pub method: Node,
    /// InputArguments property, when the method has inputs.
    pub input_arguments: Option<Node>,
    /// OutputArguments property, when the method has outputs.
    pub output_arguments: Option<Node>,
}

// =============================================================================
// NodeFactory methods
// =============================================================================

impl NodeFactory {
    /// Creates a Method below `parent`, its argument properties, and
    /// registers its callback.
    ///
    /// Argument DataTypes are resolved before anything is created.
    ///
    /// # Errors
    ///
    /// - Any error of node creation for the Method itself.
    /// - [`NodesError::MethodWiring`] when a later phase fails.
    pub async fn create_method(
        &self,
        parent: &Node,
        identity: impl Into<Identity>,
        options: MethodOptions,
    ) -> NodesResult<MethodNode> {
        let identity: Identity = identity.into();
        let (node_id, browse_name) = identity.resolve()?;
        let inputs = self.arguments(&options.inputs)?;
        let outputs = self.arguments(&options.outputs)?;

        let item = AddNodesItem::method(parent.node_id().clone(), node_id, browse_name);
        let method = self.submit(parent, item).await?;

        let mut completed = vec![MethodPhase::Node];
        let fail = |completed: Vec<MethodPhase>, failed: MethodPhase, source: NodesError| {
            tracing::error!(
                method = %method.node_id(),
                phase = %failed,
                error = %source,
                "Method wiring failed"
            );
            NodesError::from(MethodWiringError {
                method: method.node_id().clone(),
                completed,
                failed,
                source: Box::new(source),
            })
        };

        let input_arguments = if inputs.is_empty() {
            None
        } else {
            match self.argument_property(&method, "InputArguments", inputs).await {
                Ok(node) => {
                    completed.push(MethodPhase::InputArguments);
                    Some(node)
                }
                Err(e) => return Err(fail(completed, MethodPhase::InputArguments, e)),
            }
        };

        let output_arguments = if outputs.is_empty() {
            None
        } else {
            match self.argument_property(&method, "OutputArguments", outputs).await {
                Ok(node) => {
                    completed.push(MethodPhase::OutputArguments);
                    Some(node)
                }
                Err(e) => return Err(fail(completed, MethodPhase::OutputArguments, e)),
            }
        };

        if let Err(e) = method
            .server()
            .register_method_callback(method.node_id().clone(), options.callback)
            .await
        {
            return Err(fail(completed, MethodPhase::Callback, e));
        }

        tracing::debug!(method = %method.node_id(), "Method callback registered");

        Ok(MethodNode {
            method,
            input_arguments,
            output_arguments,
        })
    }

    /// Converts an argument spec into a complete argument description.
    pub fn argument_from_type_hint(&self, spec: &ArgumentSpec) -> NodesResult<Argument> {
        match spec {
            ArgumentSpec::Descriptor(argument) => Ok(argument.clone()),
            ArgumentSpec::Type(tag) => {
                let data_type = self.inferencer().guess_data_type(&TypedValue::null(*tag))?;
                Ok(Argument::new("", data_type))
            }
        }
    }

    fn arguments(&self, specs: &[ArgumentSpec]) -> NodesResult<Vec<Argument>> {
        specs
            .iter()
            .map(|spec| self.argument_from_type_hint(spec))
            .collect()
    }

    async fn argument_property(
        &self,
        method: &Node,
        name: &str,
        arguments: Vec<Argument>,
    ) -> NodesResult<Node> {
        let value = TypedValue::new(
            VariantType::ExtensionObject,
            Value::Array(
                arguments
                    .into_iter()
                    .map(|argument| Value::ExtensionObject(ExtensionObject::Argument(argument)))
                    .collect(),
            ),
        );

        self.create_property(
            method,
            (NodeId::auto(0), QualifiedName::standard(name)),
            VariableOptions::new(value).data_type(ids::ARGUMENT),
        )
        .await
    }
}
