// ── Domain adapter ──
//
// Executes one parsed command against a network. Queries never touch
// the event sink; successful mutations publish exactly one event each.

use tracing::{debug, info};

use crate::command::{Command, CommandResult};
use crate::error::CoreError;
use crate::events::{EventPublisher, MeshEvent};
use crate::model::{Group, MeshAddress, MeshNetwork};

/// Run `command` against `network`.
///
/// The caller holds exclusive access to `network` for the duration of
/// the call.
pub fn execute(
    command: Command,
    network: &mut MeshNetwork,
    events: &EventPublisher,
) -> Result<CommandResult, CoreError> {
    match command {
        Command::GetId => Ok(CommandResult::Id(network.id.clone())),

        Command::GetMeshNetworkName => Ok(CommandResult::MeshName(network.mesh_name.clone())),

        Command::HighestAllocatableAddress => Ok(CommandResult::HighestAllocatableAddress(
            network
                .local_provisioner()
                .map_or(0, |p| p.highest_allocatable_address()),
        )),

        Command::ListNodes => Ok(CommandResult::Nodes(
            network.nodes.iter().map(|node| node.uuid).collect(),
        )),

        Command::SelectedProvisionerId => Ok(CommandResult::SelectedProvisioner(
            network.local_provisioner().map(|p| p.uuid),
        )),

        Command::AddGroup(args) => add_group(network, events, args.name),

        Command::ListGroups => Ok(CommandResult::Groups(network.groups().to_vec())),

        Command::RemoveGroup(args) => {
            let address = MeshAddress::new(args.group_address);
            let group = network.remove_group(&address)?;
            info!(network = %network.id, address = %address, name = %group.name, "group removed");
            events.publish(MeshEvent::group_removed(&address));
            Ok(CommandResult::GroupRemoved(group))
        }

        Command::GetElementsForGroup(args) => {
            let address = MeshAddress::new(args.address);
            let group = network
                .group(&address)
                .ok_or(CoreError::GroupNotFound { address })?;
            let elements = network.elements_subscribed_to(&group.address);
            debug!(address = %address, elements = elements.len(), "collected subscribed elements");
            Ok(CommandResult::ElementsForGroup(elements))
        }

        Command::Unrecognized(method) => Err(CoreError::UnrecognizedCommand { method }),

        Command::Malformed(err) => Err(err.into()),
    }
}

fn add_group(
    network: &mut MeshNetwork,
    events: &EventPublisher,
    name: String,
) -> Result<CommandResult, CoreError> {
    let provisioner = network
        .local_provisioner()
        .ok_or_else(|| CoreError::NoLocalProvisioner {
            network_id: network.id.clone(),
        })?;
    let address = network
        .next_available_group_address(provisioner)
        .ok_or(CoreError::NoGroupAddressAvailable {
            provisioner: provisioner.uuid,
        })?;

    let group = Group::new(name, MeshAddress::new(address))?;
    network.add_group(group.clone())?;

    info!(network = %network.id, address = %group.address, name = %group.name, "group added");
    events.publish(MeshEvent::group_added(&group));
    Ok(CommandResult::GroupAdded(group))
}
