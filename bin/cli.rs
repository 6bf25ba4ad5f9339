//! CLI tool for deploying and operating the liquid staking contracts.

use liquid_staking_contracts::access::Role;
use liquid_staking_contracts::ledger::{DepositManager, SupportedTokenConfig};
use liquid_staking_contracts::operators::OperatorRegistry;
use liquid_staking_contracts::repricing::{RateEngine, RepricingBounds};
use liquid_staking_contracts::token::LiquidToken;
use odra::casper_types::U256;
use odra::host::{HostEnv, NoArgs};
use odra::prelude::{Address, Addressable};
use odra::schema::casper_contract_schema::NamedCLType;
use odra_cli::{
    deploy::DeployScript,
    scenario::{Args, Error, Scenario, ScenarioMetadata},
    CommandArg, ContractProvider, DeployedContractsContainer, DeployerExt,
    OdraCli,
};

/// Deploys the liquid staking token.
pub struct LiquidTokenDeployScript;

impl DeployScript for LiquidTokenDeployScript {
    fn deploy(
        &self,
        env: &HostEnv,
        container: &mut DeployedContractsContainer
    ) -> Result<(), odra_cli::deploy::Error> {
        use liquid_staking_contracts::token::LiquidTokenInitArgs;

        let _token = LiquidToken::load_or_deploy(
            &env,
            LiquidTokenInitArgs {
                name: String::from("Liquid Staked CSPR"),
                symbol: String::from("lsCSPR"),
            },
            container,
            300_000_000_000
        )?;

        Ok(())
    }
}

/// Deploys the node-operator registry.
pub struct OperatorRegistryDeployScript;

impl DeployScript for OperatorRegistryDeployScript {
    fn deploy(
        &self,
        env: &HostEnv,
        container: &mut DeployedContractsContainer
    ) -> Result<(), odra_cli::deploy::Error> {
        let _registry = OperatorRegistry::load_or_deploy(
            &env,
            NoArgs,
            container,
            300_000_000_000
        )?;

        Ok(())
    }
}

/// Deploys the rate engine and lets it mint the liquid token.
/// Requires the token and the operator registry to be deployed first.
pub struct RateEngineDeployScript;

impl DeployScript for RateEngineDeployScript {
    fn deploy(
        &self,
        env: &HostEnv,
        container: &mut DeployedContractsContainer
    ) -> Result<(), odra_cli::deploy::Error> {
        use liquid_staking_contracts::repricing::rate_engine::RateEngineInitArgs;

        let mut token = container.contract_ref::<LiquidToken>(env)?;
        let registry = container.contract_ref::<OperatorRegistry>(env)?;

        // The deployer collects the treasury reward until it is reassigned.
        let treasury = env.caller();
        let engine = RateEngine::load_or_deploy(
            &env,
            RateEngineInitArgs {
                liquid_token: token.address().clone(),
                operator_registry: registry.address().clone(),
                treasury,
                bounds: RepricingBounds::default(),
            },
            container,
            500_000_000_000
        )?;

        env.set_gas(50_000_000_000);
        token.grant_role(Role::Minter, engine.address().clone());

        Ok(())
    }
}

/// Deploys the deposit ledger.
pub struct DepositManagerDeployScript;

impl DeployScript for DepositManagerDeployScript {
    fn deploy(
        &self,
        env: &HostEnv,
        container: &mut DeployedContractsContainer
    ) -> Result<(), odra_cli::deploy::Error> {
        use liquid_staking_contracts::ledger::deposit_manager::DepositManagerInitArgs;

        let owner = env.caller();
        let _manager = DepositManager::load_or_deploy(
            &env,
            DepositManagerInitArgs { owner },
            container,
            400_000_000_000
        )?;

        Ok(())
    }
}

/// Deploys the complete protocol.
pub struct ProtocolDeployScript;

impl DeployScript for ProtocolDeployScript {
    fn deploy(
        &self,
        env: &HostEnv,
        container: &mut DeployedContractsContainer
    ) -> Result<(), odra_cli::deploy::Error> {
        LiquidTokenDeployScript.deploy(env, container)?;
        OperatorRegistryDeployScript.deploy(env, container)?;
        RateEngineDeployScript.deploy(env, container)?;
        DepositManagerDeployScript.deploy(env, container)?;

        Ok(())
    }
}

/// Scenario to submit a repricing snapshot.
pub struct SubmitSnapshotScenario;

impl Scenario for SubmitSnapshotScenario {
    fn args(&self) -> Vec<CommandArg> {
        vec![
            CommandArg::new(
                "pre_reward_reserves",
                "Reserves backing the token before this period's rewards",
                NamedCLType::U256,
            ),
            CommandArg::new(
                "new_rewards",
                "Rewards earned since the last snapshot",
                NamedCLType::U256,
            ),
            CommandArg::new(
                "reported_supply",
                "Liquid token supply the report was computed against",
                NamedCLType::U256,
            ),
        ]
    }

    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        args: Args
    ) -> Result<(), Error> {
        let mut engine = container.contract_ref::<RateEngine>(env)?;
        let pre_reward_reserves = args.get_single::<U256>("pre_reward_reserves")?;
        let new_rewards = args.get_single::<U256>("new_rewards")?;
        let reported_supply = args.get_single::<U256>("reported_supply")?;

        env.set_gas(300_000_000_000);
        let new_rate = engine.try_submit_snapshot(pre_reward_reserves, new_rewards, reported_supply)?;

        println!("Snapshot accepted, new rate: {}", new_rate);
        Ok(())
    }
}

impl ScenarioMetadata for SubmitSnapshotScenario {
    const NAME: &'static str = "submit-snapshot";
    const DESCRIPTION: &'static str = "Submits a yield report to the rate engine";
}

/// Scenario to enable deposits and withdrawals of a token.
pub struct SupportTokenScenario;

impl Scenario for SupportTokenScenario {
    fn args(&self) -> Vec<CommandArg> {
        vec![
            CommandArg::new(
                "token",
                "Address of the token to support",
                NamedCLType::Key,
            ),
        ]
    }

    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        args: Args
    ) -> Result<(), Error> {
        let mut manager = container.contract_ref::<DepositManager>(env)?;
        let token = args.get_single::<Address>("token")?;

        env.set_gas(50_000_000_000);
        manager.try_set_supported_token(
            token,
            SupportedTokenConfig {
                deposit_enabled: true,
                withdraw_enabled: true,
            },
        )?;

        println!("Token supported for deposit and withdrawal");
        Ok(())
    }
}

impl ScenarioMetadata for SupportTokenScenario {
    const NAME: &'static str = "support-token";
    const DESCRIPTION: &'static str = "Enables deposits and withdrawals of a token";
}

/// Scenario to register a node operator with its active validator count.
pub struct RegisterOperatorScenario;

impl Scenario for RegisterOperatorScenario {
    fn args(&self) -> Vec<CommandArg> {
        vec![
            CommandArg::new(
                "reward_address",
                "Address receiving the operator's rewards",
                NamedCLType::Key,
            ),
            CommandArg::new(
                "active_validators",
                "Number of validators the operator runs",
                NamedCLType::U64,
            ),
        ]
    }

    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        args: Args
    ) -> Result<(), Error> {
        let mut registry = container.contract_ref::<OperatorRegistry>(env)?;
        let reward_address = args.get_single::<Address>("reward_address")?;
        let active_validators = args.get_single::<u64>("active_validators")?;

        env.set_gas(50_000_000_000);
        registry.try_add_operator(reward_address)?;
        registry.try_set_active_validators(reward_address, active_validators)?;

        println!("Operator registered with {} active validators", active_validators);
        Ok(())
    }
}

impl ScenarioMetadata for RegisterOperatorScenario {
    const NAME: &'static str = "register-operator";
    const DESCRIPTION: &'static str = "Registers a node operator and sets its active validators";
}

/// Main function to run the CLI tool.
pub fn main() {
    OdraCli::new()
        .about("CLI tool for the liquid staking contracts")
        // Deploy scripts
        .deploy(LiquidTokenDeployScript)
        .deploy(OperatorRegistryDeployScript)
        .deploy(RateEngineDeployScript)
        .deploy(DepositManagerDeployScript)
        .deploy(ProtocolDeployScript)
        // Contract references
        .contract::<LiquidToken>()
        .contract::<OperatorRegistry>()
        .contract::<RateEngine>()
        .contract::<DepositManager>()
        // Scenarios
        .scenario(SubmitSnapshotScenario)
        .scenario(SupportTokenScenario)
        .scenario(RegisterOperatorScenario)
        .build()
        .run();
}
