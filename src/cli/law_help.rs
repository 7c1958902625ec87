pub const LAW_ENG_HELPER: &str = "
                                General remarks \n
The program reads a reaction network from a JSON file, generates a kinetic law for every reaction
that has none and prints the balance equation d[S]/dt of every species. \n

                                Model file \n
{
  \"id\": \"example\",
  \"species\": [
    {\"id\": \"A\", \"name\": \"glucose\", \"role\": \"SimpleMolecule\"},
    {\"id\": \"B\", \"name\": \"glucose-6-phosphate\", \"role\": \"SimpleMolecule\"},
    {\"id\": \"E\", \"name\": \"hexokinase\", \"role\": \"Protein\"}
  ],
  \"reactions\": [
    {\"id\": \"r1\",
     \"reactants\": [{\"species\": \"A\", \"stoichiometry\": 1.0}],
     \"products\": [{\"species\": \"B\", \"stoichiometry\": 1.0}],
     \"modifiers\": [{\"species\": \"E\", \"role\": \"EnzymeCatalysis\"}],
     \"reversible\": false,
     \"kind\": \"StateTransition\"}
  ]
}
species roles: Gene, Rna, AntisenseRna, Protein, TruncatedProtein, SimpleMolecule, Complex,
    Receptor, IonChannel, Ion, Unknown, Degraded, Other
modifier roles: Catalysis, EnzymeCatalysis, NonEnzymeCatalysis, Activation, Inhibition,
    TranscriptionalActivation, TranscriptionalInhibition, TranslationalActivation,
    TranslationalInhibition, Modulation, Trigger, PhysicalStimulation, UnknownCatalysis
reaction kinds: StateTransition, Transcription, Translation
A species without id is referred to by its name. An existing \"kinetic_law\" is kept unless
regenerateExistingLaws is set. \n

                                Settings file (kilaw_settings.txt) \n
KiLaw kinetic law settings
version:1
START
uniUniMechanism:michaelis-menten
biUniMechanism:random-order
biBiMechanism:random-order
forceAllReactionsEnzymeCatalyzed:false
regenerateExistingLaws:true
treatAsReversible:false
enzymeSpeciesRoles:RNA,ANTISENSE_RNA,GENERIC,TRUNCATED,SIMPLE_MOLECULE,COMPLEX,RECEPTOR,UNKNOWN
storeParametersGlobally:false
fallbackToMassAction:false
setBoundaryConditionForGenes:true
END
uniUniMechanism: mass-action | convenience | michaelis-menten
biUniMechanism: mass-action | convenience | random-order | ordered
biBiMechanism: mass-action | convenience | random-order | ping-pong | ordered
forceAllReactionsEnzymeCatalyzed: every reaction is treated as enzyme catalysed
regenerateExistingLaws: replace laws already present in the model
treatAsReversible: every reaction is generated reversible
enzymeSpeciesRoles: species roles that make a catalyst an enzyme
storeParametersGlobally: declare all parameters model-wide
fallbackToMassAction: use mass action where the chosen mechanism does not apply
setBoundaryConditionForGenes: genes consumed by a transcription become boundary species
Unknown keys and bad values are reported and replaced by the defaults. \n

                                Parameters \n
Local parameters are named <kind>_<reaction>[_<enzyme>][_<species>], e.g. kM_r1_A or kcatp_r1_E1.
The enzyme part appears only when several enzymes catalyse the reaction (mass action: for every
catalyst). Global energy constants kG_<species> are shared by all laws of a model whose
stoichiometric matrix has no full column rank. \n
";
